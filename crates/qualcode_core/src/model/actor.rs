//! Actor-network entities: actors and typed translations between them.

use crate::model::row::RowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for an actor, formatted `actor-<suffix>`.
pub type ActorId = String;

/// Stable identifier for an actor link, formatted `link-<suffix>`.
pub type ActorLinkId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActorType {
    Human,
    NonHuman,
    Organization,
    Technology,
    Concept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationType {
    Enrolls,
    Translates,
    Mediates,
    Opposes,
    AssociatesWith,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub actor_type: ActorType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorLink {
    pub id: ActorLinkId,
    pub from_actor: ActorId,
    pub to_actor: ActorId,
    pub translation_type: TranslationType,
    pub data_point_ids: Vec<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for `CodingStore::add_actor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub actor_type: ActorType,
}

impl NewActor {
    pub fn new(name: impl Into<String>, actor_type: ActorType) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            color: None,
            actor_type,
        }
    }
}

/// Input for `CodingStore::add_actor_link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActorLink {
    pub from_actor: ActorId,
    pub to_actor: ActorId,
    pub translation_type: TranslationType,
    pub data_point_ids: Vec<RowId>,
    pub notes: Option<String>,
}

impl NewActorLink {
    pub fn new(
        from_actor: impl Into<ActorId>,
        to_actor: impl Into<ActorId>,
        translation_type: TranslationType,
    ) -> Self {
        Self {
            from_actor: from_actor.into(),
            to_actor: to_actor.into(),
            translation_type,
            data_point_ids: Vec::new(),
            notes: None,
        }
    }

    pub fn involving(mut self, rows: impl IntoIterator<Item = RowId>) -> Self {
        self.data_point_ids.extend(rows);
        self
    }
}
