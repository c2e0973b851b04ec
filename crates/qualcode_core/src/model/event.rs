//! Audit log entries for code-level mutations.
//!
//! # Invariants
//! - Events are never edited after append.
//! - `data_point_ids` carries the rows the caller requested, not only the
//!   rows whose membership actually changed.

use crate::model::code::CodeId;
use crate::model::row::RowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingAction {
    Apply,
    Remove,
    Create,
    Merge,
    Split,
}

impl CodingAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Remove => "remove",
            Self::Create => "create",
            Self::Merge => "merge",
            Self::Split => "split",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingEvent {
    pub timestamp: DateTime<Utc>,
    pub action: CodingAction,
    pub code_id: CodeId,
    pub data_point_ids: Vec<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CodingEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        action: CodingAction,
        code_id: impl Into<CodeId>,
        data_point_ids: Vec<RowId>,
    ) -> Self {
        Self {
            timestamp,
            action,
            code_id: code_id.into(),
            data_point_ids,
            coder: None,
            notes: None,
        }
    }

    pub fn with_coder(mut self, coder: Option<String>) -> Self {
        self.coder = coder;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
