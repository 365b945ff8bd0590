//! RCSUITE Core Types
//!
//! Pure types shared by the extractor, replay engine and mutant generator.
//! No I/O happens here; the host machine runtime is reached only through
//! the [`HostMachine`] trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod configuration;
pub mod error;
pub mod machine;
pub mod state;
pub mod step;
pub mod table;

// Re-exports
pub use action::{Action, AssignFn, ExecFn, ExecFault, ASSIGN_ACTION_TYPE};
pub use configuration::Configuration;
pub use error::{CoreError, CoreResult, MachineError};
pub use machine::{HostMachine, StateNode, TransitionOutcome};
pub use state::{Context, EventData, EventId, StateValue};
pub use step::RcStep;
pub use table::{MachineDefinition, StateDefinition, TableMachine, TransitionDefinition};
