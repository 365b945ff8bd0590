//! Symbolic machine configuration (γ).

use crate::machine::HostMachine;
use crate::state::{Context, EventData, StateValue};
use std::fmt;
use std::sync::Arc;

/// Snapshot of a machine: state value, context and the last event seen.
///
/// Configurations are values. Replay produces a new configuration and never
/// touches the one it was given.
#[derive(Clone)]
pub struct Configuration {
    /// Current state value
    pub state: StateValue,
    /// Current context
    pub context: Context,
    /// Machine this configuration belongs to
    pub machine: Arc<dyn HostMachine>,
    /// Event that produced this configuration
    pub last_event: Option<EventData>,
}

impl Configuration {
    /// Create a configuration with no last event
    #[must_use]
    pub fn new(machine: Arc<dyn HostMachine>, state: StateValue, context: Context) -> Self {
        Self {
            state,
            context,
            machine,
            last_event: None,
        }
    }

    /// Set the last event
    #[must_use]
    pub fn with_last_event(mut self, event: EventData) -> Self {
        self.last_event = Some(event);
        self
    }

    /// Canonical key of the current state
    #[must_use]
    pub fn state_key(&self) -> String {
        self.state.canonical_key()
    }

    /// Check whether both configurations refer to the same machine
    #[must_use]
    pub fn same_machine(&self, other: &Configuration) -> bool {
        Arc::ptr_eq(&self.machine, &other.machine)
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.context == other.context
            && self.last_event == other.last_event
            && self.same_machine(other)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("machine", &self.machine.id())
            .field("last_event", &self.last_event)
            .finish()
    }
}
