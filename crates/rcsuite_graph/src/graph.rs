//! Transition graph indexed by canonical source-state key.

use indexmap::{IndexMap, IndexSet};
use rcsuite_core::{RcStep, StateValue};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Outgoing RC-steps bucketed by source state.
///
/// Buckets keep extraction order and are purely additive: parallel edges
/// with the same event and target are all kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionGraph {
    buckets: IndexMap<String, Vec<RcStep>>,
}

impl TransitionGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to its source bucket
    pub fn insert(&mut self, step: RcStep) {
        self.buckets.entry(step.source_key()).or_default().push(step);
    }

    /// Outgoing steps from a state
    #[must_use]
    pub fn outgoing(&self, state: &StateValue) -> &[RcStep] {
        self.outgoing_by_key(&state.canonical_key())
    }

    /// Outgoing steps from a canonical state key
    #[must_use]
    pub fn outgoing_by_key(&self, key: &str) -> &[RcStep] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First outgoing step from `state` triggered by `event`
    #[must_use]
    pub fn find_step(&self, state: &StateValue, event: &str) -> Option<&RcStep> {
        self.outgoing(state).iter().find(|step| step.event == event)
    }

    /// Source keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Number of source states with at least one outgoing step
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of steps
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if the graph has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Underlying key to steps map
    #[must_use]
    pub fn buckets(&self) -> &IndexMap<String, Vec<RcStep>> {
        &self.buckets
    }

    /// Keys of all states reachable from `start`, `start` included, in
    /// breadth-first order.
    #[must_use]
    pub fn reachable_from(&self, start: &StateValue) -> IndexSet<String> {
        let mut seen = IndexSet::new();
        let mut queue = VecDeque::new();
        let start_key = start.canonical_key();
        seen.insert(start_key.clone());
        queue.push_back(start_key);

        while let Some(key) = queue.pop_front() {
            for step in self.outgoing_by_key(&key) {
                let target = step.target_key();
                if seen.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        seen
    }
}

impl FromIterator<RcStep> for TransitionGraph {
    fn from_iter<I: IntoIterator<Item = RcStep>>(iter: I) -> Self {
        let mut graph = Self::new();
        for step in iter {
            graph.insert(step);
        }
        graph
    }
}

/// Build a graph from a full RC-step list
#[must_use]
pub fn build_graph(rc_steps: &[RcStep]) -> TransitionGraph {
    rc_steps.iter().cloned().collect()
}
