//! Command implementations, separated from argument parsing.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use rcsuite_core::{Context, HostMachine, RcStep, StateValue, TableMachine};
use rcsuite_crf::{CrfKind, MutantGenerator, MutantReport, MutationConfig, MutationSeed, Trace};
use rcsuite_graph::{build_graph, ExtractConfig, RcExtractor};
use rcsuite_replay::{create_initial_configuration, ReplayEngine};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Read and compile a JSON machine definition
pub fn load_machine(path: &Path) -> Result<Arc<TableMachine>> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading machine {}", path.display()))?;
    let machine = TableMachine::from_json(&json)
        .wrap_err_with(|| format!("compiling machine {}", path.display()))?;
    Ok(Arc::new(machine))
}

/// Read a JSON trace
pub fn load_trace(path: &Path) -> Result<Trace> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading trace {}", path.display()))?;
    serde_json::from_str(&json).wrap_err_with(|| format!("parsing trace {}", path.display()))
}

/// Read a JSON mutation config, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<MutationConfig> {
    let Some(path) = path else {
        return Ok(MutationConfig::default());
    };
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&json).wrap_err_with(|| format!("parsing config {}", path.display()))
}

/// Seed from a flag: integers are literal, anything else is hashed
#[must_use]
pub fn parse_seed(seed: Option<&str>) -> MutationSeed {
    match seed {
        Some(text) => match text.parse::<u64>() {
            Ok(value) => MutationSeed::from_literal(value),
            Err(_) => MutationSeed::from_string(text),
        },
        None => MutationSeed::from_entropy(),
    }
}

/// Extract RC-steps, as a flat list or bucketed by source state
pub fn extract(
    machine: &TableMachine,
    costs: bool,
    max_nodes: usize,
    as_graph: bool,
) -> Result<Value> {
    let extractor = RcExtractor::new().with_config(ExtractConfig {
        annotate_costs: costs,
        max_nodes,
    });
    let steps = extractor.extract(machine);
    tracing::info!(machine = machine.id(), steps = steps.len(), "extracted RC-steps");

    let value = if as_graph {
        serde_json::to_value(build_graph(&steps))?
    } else {
        serde_json::to_value(&steps)?
    };
    Ok(value)
}

/// Outcome of following events from the initial configuration
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    /// Visited states, initial state first
    pub states: Vec<StateValue>,
    /// Steps taken
    pub steps: Vec<RcStep>,
    /// Sum of step costs
    pub total_cost: f64,
    /// Context after the last step
    pub context: Context,
}

/// Follow `events` through the machine's RC-step graph
pub fn replay(machine: Arc<TableMachine>, events: &[String]) -> Result<ReplaySummary> {
    let steps = RcExtractor::new().with_cost_annotation(true).extract(&*machine);
    let graph = build_graph(&steps);
    let host: Arc<dyn HostMachine> = machine;
    let start = create_initial_configuration(host);

    let run = ReplayEngine::new().replay_events(&graph, &start, events)?;
    tracing::info!(steps = run.steps_taken(), total_cost = run.total_cost(), "replayed events");
    Ok(ReplaySummary {
        states: run.configurations().iter().map(|c| c.state.clone()).collect(),
        steps: run.steps().to_vec(),
        total_cost: run.total_cost(),
        context: run.final_configuration().context.clone(),
    })
}

/// Generate mutants of `trace`.
///
/// A single kind yields `count` independent mutants. Several kinds yield
/// `count` compound mutants applying them in order.
pub fn mutate(
    trace: &[rcsuite_crf::TraceEvent],
    kinds: &[String],
    count: usize,
    config: MutationConfig,
    seed: MutationSeed,
) -> Result<MutantReport> {
    let parsed = kinds
        .iter()
        .map(|name| name.parse::<CrfKind>())
        .collect::<Result<Vec<_>, _>>()?;
    let mut generator = MutantGenerator::new(seed.clone()).with_config(config.clone());

    let mutants = match parsed.as_slice() {
        [] => return Err(eyre!("at least one CRF kind is required")),
        [kind] => generator.batch(trace, count, *kind),
        many => (0..count).map(|_| generator.compound(trace, many)).collect(),
    };

    let report = MutantReport::new(seed, kinds.to_vec(), config, mutants);
    tracing::info!(
        mutants = report.mutant_count(),
        bad = report.metrics.bad_state_mutants,
        "generated mutants"
    );
    Ok(report)
}
