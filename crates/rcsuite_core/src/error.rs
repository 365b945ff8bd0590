//! Core error types for RCSUITE.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Invalid encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Not found
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity
        kind: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Error reported by the host machine
    #[error(transparent)]
    Machine(#[from] MachineError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidEncoding(err.to_string())
    }
}

/// Errors reported by a host machine's transition oracle.
///
/// The extractor treats every variant as "no transition" and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    /// No handler for the event from the given state
    #[error("No transition for event {event} from state {state}")]
    NoTransition {
        /// Canonical key of the source state
        state: String,
        /// Event type
        event: String,
    },

    /// State value does not name a known node
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// Transition target does not name a known node
    #[error("Unknown target {target} for event {event}")]
    UnknownTarget {
        /// Target path as declared
        target: String,
        /// Event type
        event: String,
    },

    /// State value shape the host cannot resolve
    #[error("Unsupported state value: {0}")]
    Unsupported(String),
}
