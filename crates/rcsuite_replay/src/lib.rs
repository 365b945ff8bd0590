//! RCSUITE Replay Engine
//!
//! Symbolic configurations advanced one RC-step at a time.
//! Every replay yields a fresh configuration; inputs are never mutated.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diff;
pub mod engine;

pub use diff::{ConfigDiff, ContextChange};
pub use engine::{
    create_configuration_from_state, create_initial_configuration, replay, ReplayConfig,
    ReplayEngine, ReplayError, ReplayResult, ReplayRun,
};
