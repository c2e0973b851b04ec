//! Synchronous change notification for UI consumers.
//!
//! # Responsibility
//! - Let consumers subscribe to one named registry or derived value.
//! - Deliver the new value right after each write that changed it.
//!
//! # Invariants
//! - Callbacks run in subscription order, on the writer's call stack.
//! - A callback sees a fully propagated store; derived values are never
//!   stale when delivered.

use crate::analytics::{AssignmentsByRow, Cooccurrence, Derived, Saturation, Source};
use crate::assignments::AssignmentTable;
use crate::model::{Actor, ActorLink, Code, CodeRelation, CodingEvent, Memo, TemporalCode};

/// Named observable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Codes,
    Memos,
    Relations,
    Actors,
    ActorLinks,
    TemporalCodes,
    Assignments,
    Events,
    AssignmentsByRow,
    CodesWithFrequency,
    Cooccurrence,
    Saturation,
}

impl From<Source> for Topic {
    fn from(value: Source) -> Self {
        match value {
            Source::Codes => Self::Codes,
            Source::Memos => Self::Memos,
            Source::Relations => Self::Relations,
            Source::Actors => Self::Actors,
            Source::ActorLinks => Self::ActorLinks,
            Source::TemporalCodes => Self::TemporalCodes,
            Source::Assignments => Self::Assignments,
            Source::Events => Self::Events,
        }
    }
}

impl From<Derived> for Topic {
    fn from(value: Derived) -> Self {
        match value {
            Derived::AssignmentsByRow => Self::AssignmentsByRow,
            Derived::CodesWithFrequency => Self::CodesWithFrequency,
            Derived::Cooccurrence => Self::Cooccurrence,
            Derived::Saturation => Self::Saturation,
        }
    }
}

/// New value of one topic, borrowed from the store.
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    Codes(&'a [Code]),
    Memos(&'a [Memo]),
    Relations(&'a [CodeRelation]),
    Actors(&'a [Actor]),
    ActorLinks(&'a [ActorLink]),
    TemporalCodes(&'a [TemporalCode]),
    Assignments(&'a AssignmentTable),
    Events(&'a [CodingEvent]),
    AssignmentsByRow(&'a AssignmentsByRow),
    CodesWithFrequency(&'a [Code]),
    Cooccurrence(&'a Cooccurrence),
    Saturation(&'a Saturation),
}

impl Change<'_> {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Codes(_) => Topic::Codes,
            Self::Memos(_) => Topic::Memos,
            Self::Relations(_) => Topic::Relations,
            Self::Actors(_) => Topic::Actors,
            Self::ActorLinks(_) => Topic::ActorLinks,
            Self::TemporalCodes(_) => Topic::TemporalCodes,
            Self::Assignments(_) => Topic::Assignments,
            Self::Events(_) => Topic::Events,
            Self::AssignmentsByRow(_) => Topic::AssignmentsByRow,
            Self::CodesWithFrequency(_) => Topic::CodesWithFrequency,
            Self::Cooccurrence(_) => Topic::Cooccurrence,
            Self::Saturation(_) => Topic::Saturation,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&Change<'_>)>;

struct Subscription {
    id: ObserverId,
    topic: Topic,
    callback: Callback,
}

/// Subscriber list owned by one store.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        topic: Topic,
        callback: impl FnMut(&Change<'_>) + 'static,
    ) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            topic,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Invokes every callback subscribed to `change.topic()`.
    pub fn notify(&mut self, change: &Change<'_>) {
        let topic = change.topic();
        for subscription in &mut self.subscriptions {
            if subscription.topic == topic {
                (subscription.callback)(change);
            }
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
