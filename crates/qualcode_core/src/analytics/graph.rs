//! Push-based dependency graph for derived analytics.
//!
//! # Responsibility
//! - Declare each derived node's direct dependencies.
//! - Recompute dirty nodes eagerly, in topological order, before the
//!   mutating call returns.
//!
//! # Invariants
//! - The evaluation order is computed once from the declarations and
//!   places every node after all of its dependencies.
//! - A node recomputes iff one of its direct dependencies changed value in
//!   the current propagation.
//! - A node whose recomputed value equals its previous value does not mark
//!   its dependents dirty.

use crate::analytics::derive::{
    self, AssignmentsByRow, Cooccurrence, Saturation, SaturationSettings,
};
use crate::assignments::AssignmentTable;
use crate::audit::AuditLog;
use crate::model::Code;
use std::collections::BTreeSet;

/// Authoritative state slots owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Codes,
    Memos,
    Relations,
    Actors,
    ActorLinks,
    TemporalCodes,
    Assignments,
    Events,
}

/// Values recomputed from sources and other derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Derived {
    AssignmentsByRow,
    CodesWithFrequency,
    Cooccurrence,
    Saturation,
}

/// Any vertex of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    Source(Source),
    Derived(Derived),
}

impl Derived {
    pub const ALL: [Derived; 4] = [
        Derived::AssignmentsByRow,
        Derived::CodesWithFrequency,
        Derived::Cooccurrence,
        Derived::Saturation,
    ];

    /// Direct dependencies of this node.
    pub fn dependencies(self) -> &'static [Node] {
        match self {
            Self::AssignmentsByRow | Self::CodesWithFrequency => {
                &[Node::Source(Source::Codes), Node::Source(Source::Assignments)]
            }
            Self::Cooccurrence => &[Node::Derived(Derived::AssignmentsByRow)],
            Self::Saturation => &[Node::Source(Source::Codes), Node::Source(Source::Events)],
        }
    }
}

/// Borrowed view of the sources the derivations read.
#[derive(Debug, Clone, Copy)]
pub struct GraphInputs<'a> {
    pub codes: &'a [Code],
    pub assignments: &'a AssignmentTable,
    pub events: &'a AuditLog,
}

/// Current derived values.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedValues {
    pub assignments_by_row: AssignmentsByRow,
    pub codes_with_frequency: Vec<Code>,
    pub cooccurrence: Cooccurrence,
    pub saturation: Saturation,
}

/// Dependency graph plus the last computed value of every derived node.
#[derive(Debug, Clone)]
pub struct DerivedGraph {
    order: Vec<Derived>,
    settings: SaturationSettings,
    values: DerivedValues,
}

impl DerivedGraph {
    /// Builds the graph and computes every node from `inputs`.
    pub fn new(settings: SaturationSettings, inputs: GraphInputs<'_>) -> Self {
        let order = topological_order();
        let by_row = derive::assignments_by_row(inputs.codes, inputs.assignments);
        let values = DerivedValues {
            codes_with_frequency: derive::codes_with_frequency(inputs.codes, inputs.assignments),
            cooccurrence: derive::cooccurrence(&by_row),
            saturation: derive::saturation(inputs.codes, inputs.events, settings),
            assignments_by_row: by_row,
        };
        Self {
            order,
            settings,
            values,
        }
    }

    pub fn order(&self) -> &[Derived] {
        &self.order
    }

    pub fn values(&self) -> &DerivedValues {
        &self.values
    }

    /// Recomputes every node reachable from `changed` and returns the nodes
    /// whose value actually changed, in evaluation order.
    pub fn propagate(&mut self, changed: &[Source], inputs: GraphInputs<'_>) -> Vec<Derived> {
        let mut dirty: BTreeSet<Node> = changed.iter().copied().map(Node::Source).collect();
        let mut updated = Vec::new();

        for index in 0..self.order.len() {
            let node = self.order[index];
            if !node.dependencies().iter().any(|dep| dirty.contains(dep)) {
                continue;
            }
            // Why: an unchanged value must not wake its dependents, or observers
            // would be told about changes that did not happen.
            if self.recompute(node, inputs) {
                dirty.insert(Node::Derived(node));
                updated.push(node);
            }
        }
        updated
    }

    fn recompute(&mut self, node: Derived, inputs: GraphInputs<'_>) -> bool {
        let values = &mut self.values;
        match node {
            Derived::AssignmentsByRow => replace_if_changed(
                &mut values.assignments_by_row,
                derive::assignments_by_row(inputs.codes, inputs.assignments),
            ),
            Derived::CodesWithFrequency => replace_if_changed(
                &mut values.codes_with_frequency,
                derive::codes_with_frequency(inputs.codes, inputs.assignments),
            ),
            Derived::Cooccurrence => {
                let next = derive::cooccurrence(&values.assignments_by_row);
                replace_if_changed(&mut values.cooccurrence, next)
            }
            Derived::Saturation => replace_if_changed(
                &mut values.saturation,
                derive::saturation(inputs.codes, inputs.events, self.settings),
            ),
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

/// Kahn's algorithm over the declared dependencies. Ties resolve by
/// `Derived` ordering so the result is deterministic.
fn topological_order() -> Vec<Derived> {
    let mut pending: BTreeSet<Derived> = Derived::ALL.into_iter().collect();
    let mut order = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().copied().find(|node| {
            node.dependencies().iter().all(|dep| match dep {
                Node::Source(_) => true,
                Node::Derived(upstream) => !pending.contains(upstream),
            })
        });
        match ready {
            Some(node) => {
                pending.remove(&node);
                order.push(node);
            }
            // The declarations above are acyclic; stop rather than spin.
            None => break,
        }
    }
    order
}
