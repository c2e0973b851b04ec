//! Row identifiers sourced from the external columnar dataset.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier of one row in the underlying dataset.
///
/// The store never interprets row ids; it only compares, orders and
/// stringifies them. Numeric ids sort before text ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Positional row index.
    Num(i64),
    /// Any other externally defined key.
    Text(String),
}

impl Display for RowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for RowId {
    fn from(value: i32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl From<u32> for RowId {
    fn from(value: u32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
