//! Derived analytics engine.
//!
//! # Responsibility
//! - Derive per-row code sets, live code frequencies, code co-occurrence and
//!   the saturation trend from the assignment table and audit log.
//! - Keep derived values current through an explicit dependency graph.
//!
//! # Invariants
//! - Derived values hold no memory beyond their declared inputs.
//! - No derived value is observable stale after a mutating call returns.

pub mod derive;
pub mod graph;

pub use derive::{AssignmentsByRow, Cooccurrence, Saturation, SaturationSettings, SaturationTrend};
pub use graph::{Derived, DerivedGraph, DerivedValues, GraphInputs, Node, Source};
