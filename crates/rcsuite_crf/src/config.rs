//! Mutation configuration.

use crate::pool::{
    default_wrong_messages, default_wrong_payloads, DEFAULT_INJECTION_RATE, DEFAULT_TIMEOUT_MS,
};
use crate::trace::Payload;
use serde::{Deserialize, Serialize};

/// Settings shared by every mutation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Per-index Bernoulli probability
    pub injection_rate: f64,
    /// Explicit indices; bypasses sampling when set
    pub injection_positions: Option<Vec<usize>>,
    /// Replacement event identifiers
    pub wrong_messages: Vec<String>,
    /// Replacement payloads
    pub wrong_payloads: Vec<Payload>,
    /// Timeout carried by missing-message markers
    pub timeout_ms: u64,
}

impl MutationConfig {
    /// Create a new config with default pools
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the injection rate
    #[must_use]
    pub fn with_injection_rate(mut self, rate: f64) -> Self {
        self.injection_rate = rate;
        self
    }

    /// Set explicit injection positions
    #[must_use]
    pub fn with_injection_positions(mut self, positions: Vec<usize>) -> Self {
        self.injection_positions = Some(positions);
        self
    }

    /// Set the wrong-message pool
    #[must_use]
    pub fn with_wrong_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrong_messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the wrong-payload pool
    #[must_use]
    pub fn with_wrong_payloads(mut self, payloads: Vec<Payload>) -> Self {
        self.wrong_payloads = payloads;
        self
    }

    /// Set the missing-message timeout
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Injection rate clamped to `[0, 1]`; NaN reads as zero
    #[must_use]
    pub fn effective_rate(&self) -> f64 {
        if self.injection_rate.is_nan() {
            0.0
        } else {
            self.injection_rate.clamp(0.0, 1.0)
        }
    }

    /// Wrong-message pool, or the defaults when empty
    #[must_use]
    pub fn message_pool(&self) -> Vec<String> {
        if self.wrong_messages.is_empty() {
            default_wrong_messages()
        } else {
            self.wrong_messages.clone()
        }
    }

    /// Wrong-payload pool, or the defaults when empty
    #[must_use]
    pub fn payload_pool(&self) -> Vec<Payload> {
        if self.wrong_payloads.is_empty() {
            default_wrong_payloads()
        } else {
            self.wrong_payloads.clone()
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            injection_rate: DEFAULT_INJECTION_RATE,
            injection_positions: None,
            wrong_messages: default_wrong_messages(),
            wrong_payloads: default_wrong_payloads(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
