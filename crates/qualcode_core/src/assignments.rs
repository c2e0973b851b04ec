//! Assignment table: the many-to-many mapping between codes and rows.
//!
//! # Invariants
//! - A row appears at most once per code (set semantics).
//! - A code's entry is kept, possibly empty, once it has been touched.
//! - Rows within one code iterate in `RowId` order.

use crate::model::{CodeId, RowId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    sets: BTreeMap<CodeId, BTreeSet<RowId>>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `rows` into the code's set. Returns how many rows were new.
    pub fn apply(&mut self, code_id: &str, rows: &[RowId]) -> usize {
        let set = self.sets.entry(code_id.to_string()).or_default();
        rows.iter().filter(|row| set.insert((*row).clone())).count()
    }

    /// Removes `rows` from the code's set. Returns how many were present.
    pub fn remove(&mut self, code_id: &str, rows: &[RowId]) -> usize {
        match self.sets.get_mut(code_id) {
            Some(set) => rows.iter().filter(|row| set.remove(*row)).count(),
            None => 0,
        }
    }

    /// Empties the code's set and returns its former rows.
    pub fn take(&mut self, code_id: &str) -> BTreeSet<RowId> {
        self.sets
            .get_mut(code_id)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn rows_for(&self, code_id: &str) -> Option<&BTreeSet<RowId>> {
        self.sets.get(code_id)
    }

    pub fn contains(&self, code_id: &str, row: &RowId) -> bool {
        self.sets
            .get(code_id)
            .is_some_and(|set| set.contains(row))
    }

    /// Live assignment count for one code.
    pub fn frequency(&self, code_id: &str) -> usize {
        self.sets.get(code_id).map_or(0, BTreeSet::len)
    }

    /// Total number of (code, row) pairs.
    pub fn total(&self) -> usize {
        self.sets.values().map(BTreeSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CodeId, &BTreeSet<RowId>)> {
        self.sets.iter()
    }
}
