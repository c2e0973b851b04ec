//! Code domain model.
//!
//! # Responsibility
//! - Define the hierarchical tag applied to data rows.
//! - Define the `create_code` input shape and its defaults.
//!
//! # Invariants
//! - `id` is stable and never reused for another code.
//! - `parent_id`, when set, names a code that existed at creation time.
//! - `level` is advisory and not checked against tree depth.

use crate::model::actor::ActorType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier for a code, formatted `code-<suffix>`.
pub type CodeId = String;

/// Analytical depth of a code: 1 = open, 2 = axial, 3 = selective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CodeLevel {
    #[default]
    One,
    Two,
    Three,
}

impl CodeLevel {
    /// Numeric form used on the wire and in exports.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for CodeLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("code level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<CodeLevel> for u8 {
    fn from(value: CodeLevel) -> Self {
        value.as_u8()
    }
}

impl Display for CodeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Canonical code record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub id: CodeId,
    pub name: String,
    pub description: String,
    /// `#rgb` or `#rrggbb` hex color.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CodeId>,
    pub level: CodeLevel,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Live assignment count. Zero in the registry; filled by analytics.
    #[serde(default)]
    pub frequency: usize,
    /// Set when the code stands for an actor category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_type: Option<ActorType>,
}

impl Code {
    /// Returns whether this code sits at the root of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for `CodingStore::create_code`.
///
/// Every field is optional; absent values fall back to store defaults
/// (`"New Code"`, level 1, palette color by registry size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCode {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<CodeId>,
    pub level: Option<CodeLevel>,
    pub created_by: Option<String>,
    pub actor_type: Option<ActorType>,
}

impl NewCode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<CodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_level(mut self, level: CodeLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::CodeLevel;

    #[test]
    fn level_rejects_values_outside_one_to_three() {
        assert_eq!(CodeLevel::try_from(2), Ok(CodeLevel::Two));
        assert!(CodeLevel::try_from(0).is_err());
        assert!(CodeLevel::try_from(4).is_err());
    }
}
