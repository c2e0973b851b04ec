//! Codes observed over a time window.
//!
//! # Invariants
//! - `end`, when present, is not earlier than `start`.

use crate::model::code::CodeId;
use crate::model::row::RowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a temporal code, formatted `tcode-<suffix>`.
pub type TemporalCodeId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalCode {
    pub id: TemporalCodeId,
    pub code_id: CodeId,
    pub data_point_ids: Vec<RowId>,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TemporalCode {
    /// Returns whether `instant` falls inside the window. Open windows
    /// extend forever.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && self.end.map_or(true, |end| instant <= end)
    }
}

/// Input for `CodingStore::add_temporal_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemporalCode {
    pub code_id: CodeId,
    pub data_point_ids: Vec<RowId>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewTemporalCode {
    pub fn new(code_id: impl Into<CodeId>, start: DateTime<Utc>) -> Self {
        Self {
            code_id: code_id.into(),
            data_point_ids: Vec::new(),
            start,
            end: None,
            notes: None,
        }
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn on_rows(mut self, rows: impl IntoIterator<Item = RowId>) -> Self {
        self.data_point_ids.extend(rows);
        self
    }
}
