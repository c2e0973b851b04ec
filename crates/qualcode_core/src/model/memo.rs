//! Memo domain model.
//!
//! # Invariants
//! - Memos are append-only; there is no update path.
//! - `tags` are lowercase, trimmed, deduplicated and sorted.

use crate::model::code::CodeId;
use crate::model::row::RowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a memo, formatted `memo-<suffix>`.
pub type MemoId = String;

/// Analytical register of a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoType {
    Theoretical,
    Methodological,
    Observational,
}

impl MemoType {
    /// Wire name, also used as the `type` attribute in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theoretical => "theoretical",
            Self::Methodological => "methodological",
            Self::Observational => "observational",
        }
    }
}

/// Free-text note linked to codes and rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub content: String,
    pub linked_codes: Vec<CodeId>,
    pub linked_data_point_ids: Vec<RowId>,
    pub memo_type: MemoType,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Input for `CodingStore::create_memo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemo {
    pub content: String,
    pub memo_type: MemoType,
    pub linked_codes: Vec<CodeId>,
    pub linked_data_point_ids: Vec<RowId>,
    pub tags: Vec<String>,
}

impl NewMemo {
    pub fn new(content: impl Into<String>, memo_type: MemoType) -> Self {
        Self {
            content: content.into(),
            memo_type,
            linked_codes: Vec::new(),
            linked_data_point_ids: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn linked_to_code(mut self, code_id: impl Into<CodeId>) -> Self {
        self.linked_codes.push(code_id.into());
        self
    }

    pub fn linked_to_rows(mut self, rows: impl IntoIterator<Item = RowId>) -> Self {
        self.linked_data_point_ids.extend(rows);
        self
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
