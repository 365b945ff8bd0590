//! Replay engine for advancing configurations along RC-steps.

use rcsuite_core::{
    Action, Configuration, Context, EventData, HostMachine, RcStep, StateValue,
};
use rcsuite_graph::{get_cost, TransitionGraph};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Replay result type
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Replay engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Reject steps whose source is not the current state
    pub strict_source: bool,
    /// Maximum steps to replay (0 = unlimited)
    pub max_steps: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            strict_source: true,
            max_steps: 0,
        }
    }
}

/// Replay engine error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// Step does not leave the current state
    #[error("Step {index} leaves {expected} but configuration is in {actual}")]
    SourceMismatch {
        /// Position of the step in the path
        index: usize,
        /// Source key of the step
        expected: String,
        /// Key of the current state
        actual: String,
    },

    /// No outgoing step for the requested event
    #[error("No step for event {event} from {state} at position {index}")]
    NoStep {
        /// Position of the event in the input
        index: usize,
        /// Key of the current state
        state: String,
        /// Requested event type
        event: String,
    },
}

/// Configuration γ₀ from the machine's declared initial state and context
#[must_use]
pub fn create_initial_configuration(machine: Arc<dyn HostMachine>) -> Configuration {
    let state = machine.initial_state();
    let context = machine.context().cloned().unwrap_or_default();
    Configuration::new(machine, state, context)
}

/// Configuration snapshot at an arbitrary state.
///
/// Context defaults to the supplied value, then the machine's declared
/// context, then an empty map.
#[must_use]
pub fn create_configuration_from_state(
    machine: Arc<dyn HostMachine>,
    state: StateValue,
    context: Option<Context>,
) -> Configuration {
    let context = context
        .or_else(|| machine.context().cloned())
        .unwrap_or_default();
    Configuration::new(machine, state, context)
}

/// Advance `config` along `step`, returning a new configuration.
///
/// Actions run in list order against a working copy of the context:
/// function assigns replace it, patch assigns are shallow-merged (later keys
/// win), and every other action leaves it untouched. `config` is not mutated.
#[must_use]
pub fn replay(step: &RcStep, config: &Configuration) -> Configuration {
    let event = EventData::new(step.event.clone());
    let context = step
        .actions
        .iter()
        .fold(config.context.clone(), |context, action| {
            apply_action(context, action, &event)
        });

    Configuration {
        state: step.target.clone(),
        context,
        machine: Arc::clone(&config.machine),
        last_event: Some(event),
    }
}

fn apply_action(mut context: Context, action: &Action, event: &EventData) -> Context {
    match action {
        Action::AssignFn(assign) => assign(&context, event),
        Action::AssignPatch { patch, .. } => {
            for (key, value) in patch {
                context.insert(key.clone(), value.clone());
            }
            context
        }
        _ => context,
    }
}

/// Configurations visited by a multi-step replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRun {
    configurations: Vec<Configuration>,
    steps: Vec<RcStep>,
    total_cost: f64,
}

impl ReplayRun {
    fn new(start: Configuration) -> Self {
        Self {
            configurations: vec![start],
            steps: Vec::new(),
            total_cost: 0.0,
        }
    }

    fn push(&mut self, step: &RcStep) {
        let current = self.final_configuration();
        let cost = get_cost(current, step);
        let next = replay(step, current);
        self.total_cost += cost;
        self.configurations.push(next);
        self.steps.push(step.clone());
    }

    /// Start configuration followed by one configuration per step
    #[must_use]
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Steps taken, in order
    #[must_use]
    pub fn steps(&self) -> &[RcStep] {
        &self.steps
    }

    /// Sum of step costs, each priced from the configuration before it
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Last configuration reached
    #[must_use]
    pub fn final_configuration(&self) -> &Configuration {
        // Never empty: `new` seeds the run with the start configuration.
        &self.configurations[self.configurations.len() - 1]
    }

    /// Number of steps replayed
    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.configurations.len() - 1
    }
}

/// Replay engine for walking paths of RC-steps
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    config: ReplayConfig,
}

impl ReplayEngine {
    /// Create a new replay engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay a path of steps from `start`
    ///
    /// # Errors
    ///
    /// Returns error if strict mode is on and a step does not leave the
    /// current state
    pub fn replay_path(&self, steps: &[RcStep], start: &Configuration) -> ReplayResult<ReplayRun> {
        self.replay_with_callback(steps, start, |_, _| {})
    }

    /// Replay a path of steps, calling `callback` after each step
    ///
    /// # Errors
    ///
    /// Returns error if strict mode is on and a step does not leave the
    /// current state
    pub fn replay_with_callback<F>(
        &self,
        steps: &[RcStep],
        start: &Configuration,
        mut callback: F,
    ) -> ReplayResult<ReplayRun>
    where
        F: FnMut(&RcStep, &Configuration),
    {
        let mut run = ReplayRun::new(start.clone());

        for (index, step) in steps.iter().enumerate() {
            if self.limit_reached(index) {
                break;
            }
            if self.config.strict_source && step.source != run.final_configuration().state {
                return Err(ReplayError::SourceMismatch {
                    index,
                    expected: step.source_key(),
                    actual: run.final_configuration().state_key(),
                });
            }
            run.push(step);
            callback(step, run.final_configuration());
        }

        tracing::debug!(
            steps = run.steps_taken(),
            total_cost = run.total_cost,
            "replayed path"
        );
        Ok(run)
    }

    /// Follow `events` through `graph`, taking the first outgoing step that
    /// matches each event
    ///
    /// # Errors
    ///
    /// Returns error if an event has no outgoing step from the current state
    pub fn replay_events<S: AsRef<str>>(
        &self,
        graph: &TransitionGraph,
        start: &Configuration,
        events: &[S],
    ) -> ReplayResult<ReplayRun> {
        let mut run = ReplayRun::new(start.clone());

        for (index, event) in events.iter().enumerate() {
            if self.limit_reached(index) {
                break;
            }
            let event = event.as_ref();
            let current = run.final_configuration();
            let step = graph
                .find_step(&current.state, event)
                .ok_or_else(|| ReplayError::NoStep {
                    index,
                    state: current.state_key(),
                    event: event.to_string(),
                })?;
            run.push(step);
        }

        tracing::debug!(
            steps = run.steps_taken(),
            total_cost = run.total_cost,
            "replayed events"
        );
        Ok(run)
    }

    fn limit_reached(&self, index: usize) -> bool {
        self.config.max_steps > 0 && index >= self.config.max_steps
    }
}
