//! Directed typed edges between codes.
//!
//! Cycles and self-loops are not prevented; both endpoints must exist.

use crate::model::code::CodeId;
use serde::{Deserialize, Serialize};

/// Stable identifier for a relation, formatted `rel-<suffix>`.
pub type RelationId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    IsA,
    PartOf,
    Causes,
    Contradicts,
    AssociatesWith,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRelation {
    pub id: RelationId,
    pub from_code: CodeId,
    pub to_code: CodeId,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CodeRelation {
    /// Returns whether `code_id` is either endpoint of this edge.
    pub fn touches(&self, code_id: &str) -> bool {
        self.from_code == code_id || self.to_code == code_id
    }
}

/// Input for `CodingStore::create_relation`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelation {
    pub from_code: CodeId,
    pub to_code: CodeId,
    pub relation_type: RelationType,
    pub strength: Option<f64>,
    pub notes: Option<String>,
}

impl NewRelation {
    pub fn new(
        from_code: impl Into<CodeId>,
        to_code: impl Into<CodeId>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            from_code: from_code.into(),
            to_code: to_code.into(),
            relation_type,
            strength: None,
            notes: None,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }
}
