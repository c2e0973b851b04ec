//! Serializable copy of a whole coding session.

use crate::analytics::{Cooccurrence, Saturation};
use crate::model::{
    Actor, ActorLink, Code, CodeId, CodeRelation, CodingEvent, Memo, RowId, TemporalCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time copy of registries, assignments, audit log and analytics.
///
/// `codes` carry live frequencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub codes: Vec<Code>,
    pub memos: Vec<Memo>,
    pub relations: Vec<CodeRelation>,
    pub actors: Vec<Actor>,
    pub actor_links: Vec<ActorLink>,
    pub temporal_codes: Vec<TemporalCode>,
    pub assignments: BTreeMap<CodeId, Vec<RowId>>,
    pub events: Vec<CodingEvent>,
    pub cooccurrence: Cooccurrence,
    pub saturation: Saturation,
}
