//! Use-case services.
//!
//! # Responsibility
//! - Expose the coding store façade that UI layers call.
//! - Keep callers decoupled from registry, table and graph internals.

pub mod coding_store;

pub use coding_store::{
    CodingStore, StoreError, StoreResult, DEFAULT_ACTOR_NAME, DEFAULT_CODE_NAME,
};
