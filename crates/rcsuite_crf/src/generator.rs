//! Seeded mutant generator.

use crate::config::MutationConfig;
use crate::error::CrfResult;
use crate::kind::CrfKind;
use crate::mutate::{self, Mutant};
use crate::seed::MutationSeed;
use crate::trace::TraceEvent;
use rand_chacha::ChaCha8Rng;

/// Bundles a configuration with a generator built from a seed.
///
/// Successive calls advance one stream, so a fixed seed and call sequence
/// always reproduce the same mutants.
#[derive(Debug, Clone)]
pub struct MutantGenerator {
    config: MutationConfig,
    seed: MutationSeed,
    rng: ChaCha8Rng,
}

impl MutantGenerator {
    /// Create a new generator with the default configuration
    #[must_use]
    pub fn new(seed: MutationSeed) -> Self {
        Self {
            config: MutationConfig::default(),
            rng: seed.rng(),
            seed,
        }
    }

    /// Set the configuration
    #[must_use]
    pub fn with_config(mut self, config: MutationConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Get the seed
    #[must_use]
    pub fn seed(&self) -> &MutationSeed {
        &self.seed
    }

    /// Generate one mutant
    pub fn generate(&mut self, trace: &[TraceEvent], kind: CrfKind) -> Mutant {
        mutate::generate_mutant(trace, kind, &self.config, &mut self.rng)
    }

    /// Generate one mutant for a kind tag
    ///
    /// # Errors
    ///
    /// Returns error if the tag is not a known kind
    pub fn generate_named(&mut self, trace: &[TraceEvent], name: &str) -> CrfResult<Mutant> {
        mutate::generate_mutant_by_name(trace, name, &self.config, &mut self.rng)
    }

    /// Generate a compound mutant
    pub fn compound(&mut self, trace: &[TraceEvent], kinds: &[CrfKind]) -> Mutant {
        mutate::compound_mutant(trace, kinds, &self.config, &mut self.rng)
    }

    /// Generate `count` mutants
    pub fn batch(&mut self, trace: &[TraceEvent], count: usize, kind: CrfKind) -> Vec<Mutant> {
        mutate::batch_generate_mutants(trace, count, kind, &self.config, &mut self.rng)
    }
}

impl Default for MutantGenerator {
    fn default() -> Self {
        Self::new(MutationSeed::default())
    }
}
