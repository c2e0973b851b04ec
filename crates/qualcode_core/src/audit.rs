//! Append-only audit log of code-level mutations.

use crate::model::{CodingAction, CodingEvent};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuditLog {
    events: Vec<CodingEvent>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: CodingEvent) {
        self.events.push(event);
    }

    /// Returns the last `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> &[CodingEvent] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    /// Counts `action` entries among the last `window` entries.
    pub fn count_recent(&self, action: CodingAction, window: usize) -> usize {
        self.tail(window)
            .iter()
            .filter(|event| event.action == action)
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[CodingEvent] {
        &self.events
    }
}
