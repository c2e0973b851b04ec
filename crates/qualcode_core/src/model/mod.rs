//! Entity model for the coding store.
//!
//! # Responsibility
//! - Define the canonical records owned by the store (codes, memos,
//!   relations, actors, actor links, temporal codes) and the audit event.
//! - Define one explicit input struct per mutation.
//!
//! # Invariants
//! - Every entity is identified by a prefixed opaque string id.
//! - `Code::frequency` is never authoritative; it is materialized on read.
//! - Entities are never deleted; only assignment membership is removable.

pub mod actor;
pub mod code;
pub mod event;
pub mod memo;
pub mod relation;
pub mod row;
pub mod temporal;

pub use actor::{
    Actor, ActorId, ActorLink, ActorLinkId, ActorType, NewActor, NewActorLink, TranslationType,
};
pub use code::{Code, CodeId, CodeLevel, NewCode};
pub use event::{CodingAction, CodingEvent};
pub use memo::{Memo, MemoId, MemoType, NewMemo};
pub use relation::{CodeRelation, NewRelation, RelationId, RelationType};
pub use row::RowId;
pub use temporal::{NewTemporalCode, TemporalCode, TemporalCodeId};
