//! Boundary with the host state-machine runtime.
//!
//! The host owns the node hierarchy and the transition function; RCSUITE
//! only reads them. Nodes are addressed by id, so a host may present a
//! node graph with shared or cyclic child references.

use crate::action::Action;
use crate::error::MachineError;
use crate::state::{Context, EventData, EventId, StateValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of the host machine's hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    /// Unique node id
    pub id: String,
    /// State value the machine is in when this node is active
    pub value: StateValue,
    /// Event types declared directly on this node
    pub own_events: Vec<EventId>,
    /// Child key to child node id
    pub states: IndexMap<String, String>,
}

impl StateNode {
    /// Create a new node without events or children
    #[must_use]
    pub fn new(id: impl Into<String>, value: StateValue) -> Self {
        Self {
            id: id.into(),
            value,
            own_events: Vec::new(),
            states: IndexMap::new(),
        }
    }

    /// Declare an own event
    #[must_use]
    pub fn with_event(mut self, event: impl Into<EventId>) -> Self {
        self.own_events.push(event.into());
        self
    }

    /// Add a child reference
    #[must_use]
    pub fn with_child(mut self, key: impl Into<String>, child_id: impl Into<String>) -> Self {
        self.states.insert(key.into(), child_id.into());
        self
    }
}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    /// Resulting state value
    pub value: StateValue,
    /// Actions executed by the transition, in order
    pub actions: Vec<Action>,
}

/// Host machine runtime, treated as an opaque transition oracle
pub trait HostMachine: Send + Sync {
    /// Machine id
    fn id(&self) -> &str;

    /// Root node of the hierarchy
    fn root(&self) -> &StateNode;

    /// Look up a node by id
    fn node(&self, id: &str) -> Option<&StateNode>;

    /// Declared initial state value
    fn initial_state(&self) -> StateValue;

    /// Declared initial context, if any
    fn context(&self) -> Option<&Context>;

    /// Compute the transition for `event` from `state`.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid or unsupported
    fn transition(
        &self,
        state: &StateValue,
        event: &EventData,
    ) -> Result<TransitionOutcome, MachineError>;
}
