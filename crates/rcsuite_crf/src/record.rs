//! Mutant reports handed to the evaluation layer.

use crate::config::MutationConfig;
use crate::metrics::{calculate_mutant_metrics, MutantMetrics};
use crate::mutate::Mutant;
use crate::seed::MutationSeed;
use serde::{Deserialize, Serialize};

/// Everything needed to reproduce and summarise a mutation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutantReport {
    /// Seed used for the run
    pub seed: MutationSeed,
    /// Requested kind tags, in application order
    pub kinds: Vec<String>,
    /// Configuration used for the run
    pub config: MutationConfig,
    /// Generated mutants
    pub mutants: Vec<Mutant>,
    /// Metrics over `mutants`
    pub metrics: MutantMetrics,
}

impl MutantReport {
    /// Create a new report, computing metrics from the mutants
    #[must_use]
    pub fn new(
        seed: MutationSeed,
        kinds: Vec<String>,
        config: MutationConfig,
        mutants: Vec<Mutant>,
    ) -> Self {
        let metrics = calculate_mutant_metrics(&mutants);
        Self {
            seed,
            kinds,
            config,
            mutants,
            metrics,
        }
    }

    /// Get mutant count
    #[must_use]
    pub fn mutant_count(&self) -> usize {
        self.mutants.len()
    }

    /// Serialize to JSON
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize to indented JSON
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from JSON
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
