//! Core domain logic for qualitative coding of tabular rows.
//! This crate is the single source of truth for coding invariants.

pub mod analytics;
pub mod assignments;
pub mod audit;
pub mod clock;
pub mod config;
pub mod export;
pub mod ids;
pub mod logging;
pub mod model;
pub mod observe;
pub mod registry;
pub mod service;
pub mod validate;

pub use analytics::{AssignmentsByRow, Cooccurrence, Saturation, SaturationTrend};
pub use assignments::AssignmentTable;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, StoreConfig};
pub use export::{ExportError, ProjectSnapshot, EXPORT_FILE_NAME};
pub use ids::{create_id, IdGenerator, IdSource};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::{
    Actor, ActorLink, ActorType, Code, CodeId, CodeLevel, CodeRelation, CodingAction, CodingEvent,
    Memo, MemoType, NewActor, NewActorLink, NewCode, NewMemo, NewRelation, NewTemporalCode,
    RelationType, RowId, TemporalCode, TranslationType,
};
pub use observe::{Change, ObserverId, Topic};
pub use service::{CodingStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
