//! RCSUITE Common Robustness Failure Mutants
//!
//! Fault injection into recorded traces. Three failure classes are
//! supported: wrong message, wrong payload and missing message. Every
//! sampling call takes an explicit generator, so runs are reproducible
//! from a seed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod generator;
pub mod kind;
pub mod metrics;
pub mod mutate;
pub mod pool;
pub mod record;
pub mod seed;
pub mod trace;

pub use config::MutationConfig;
pub use error::{CrfError, CrfResult};
pub use generator::MutantGenerator;
pub use kind::CrfKind;
pub use metrics::{calculate_mutant_metrics, MutantMetrics};
pub use mutate::{
    batch_generate_mutants, compound_mutant, generate_mutant, generate_mutant_by_name,
    missing_message, select_positions, wrong_message, wrong_payload, Mutant,
};
pub use pool::{DEFAULT_INJECTION_RATE, DEFAULT_TIMEOUT_MS, TIMEOUT_EVENT};
pub use record::MutantReport;
pub use seed::{MutationSeed, SeedSource};
pub use trace::{Payload, Provenance, Trace, TraceEvent};
