//! RCSUITE Transition Graphs
//!
//! Extracts RC-steps from a host machine, resolves their costs and indexes
//! them by source state for reachability queries.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cost;
pub mod extract;
pub mod graph;

pub use cost::{
    coerce_cost, get_cost, parse_call_cost, parse_type_cost, resolve_action_cost,
    resolve_actions_cost,
};
pub use extract::{extract_rc, ExtractConfig, RcExtractor};
pub use graph::{build_graph, TransitionGraph};
