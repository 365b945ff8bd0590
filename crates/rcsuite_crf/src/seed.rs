//! Seed management for reproducible mutant generation.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;

/// Source of a mutation seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedSource {
    /// From a literal value
    Literal(u64),
    /// From a string (hashed)
    FromString(String),
    /// Drawn from the thread generator (non-deterministic)
    Entropy,
}

impl SeedSource {
    /// Generate a seed value
    #[must_use]
    pub fn to_seed(&self) -> u64 {
        match self {
            SeedSource::Literal(seed) => *seed,
            SeedSource::FromString(s) => {
                let mut hasher = fnv::FnvHasher::default();
                hasher.write(s.as_bytes());
                hasher.finish()
            }
            SeedSource::Entropy => rand::thread_rng().next_u64(),
        }
    }
}

/// Seed for a mutation run.
///
/// The resolved value is stored alongside its source, so a run seeded from
/// entropy can still be reproduced from its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationSeed {
    /// Base seed value
    pub seed: u64,
    /// Source of the seed
    pub source: SeedSource,
    /// Namespace for derived seeds
    pub namespace: String,
}

impl MutationSeed {
    /// Create a new mutation seed
    #[must_use]
    pub fn new(source: SeedSource) -> Self {
        let seed = source.to_seed();
        Self {
            seed,
            source,
            namespace: String::new(),
        }
    }

    /// Create a seed from a literal value
    #[must_use]
    pub fn from_literal(seed: u64) -> Self {
        Self::new(SeedSource::Literal(seed))
    }

    /// Create a seed from a string
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::new(SeedSource::FromString(s.into()))
    }

    /// Create a fresh non-deterministic seed
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(SeedSource::Entropy)
    }

    /// Set namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Derive a seed for a specific context, e.g. one batch member
    #[must_use]
    pub fn derive(&self, context: &str) -> Self {
        let mut hasher = fnv::FnvHasher::default();
        hasher.write_u64(self.seed);
        hasher.write(self.namespace.as_bytes());
        hasher.write(context.as_bytes());
        let derived_seed = hasher.finish();

        Self {
            seed: derived_seed,
            source: SeedSource::Literal(derived_seed),
            namespace: self.namespace.clone(),
        }
    }

    /// Create RNG from seed
    #[must_use]
    pub fn into_rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// Create RNG borrowing seed
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

impl Default for MutationSeed {
    fn default() -> Self {
        Self::from_literal(42)
    }
}
