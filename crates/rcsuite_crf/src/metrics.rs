//! Aggregate statistics over a mutant set.

use crate::kind::CrfKind;
use crate::mutate::Mutant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a mutant set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutantMetrics {
    /// Number of mutants
    pub total_mutants: usize,
    /// Mutants with at least one injected fault
    pub bad_state_mutants: usize,
    /// Mean injection-point count; zero for an empty set
    pub average_injection_points: f64,
    /// Mutant count per failure class, every class present
    pub crf_distribution: BTreeMap<CrfKind, usize>,
}

impl Default for MutantMetrics {
    fn default() -> Self {
        Self {
            total_mutants: 0,
            bad_state_mutants: 0,
            average_injection_points: 0.0,
            crf_distribution: CrfKind::ALL.into_iter().map(|kind| (kind, 0)).collect(),
        }
    }
}

/// Compute metrics for a mutant set
#[must_use]
pub fn calculate_mutant_metrics(mutants: &[Mutant]) -> MutantMetrics {
    let mut metrics = MutantMetrics {
        total_mutants: mutants.len(),
        ..MutantMetrics::default()
    };
    if mutants.is_empty() {
        return metrics;
    }

    let mut points = 0usize;
    for mutant in mutants {
        if mutant.expected_bad_state {
            metrics.bad_state_mutants += 1;
        }
        points += mutant.injection_count();
        *metrics.crf_distribution.entry(mutant.crf_type).or_insert(0) += 1;
    }
    metrics.average_injection_points = points as f64 / mutants.len() as f64;
    metrics
}
