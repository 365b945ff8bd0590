//! RC-steps: recorded transitions usable as graph edges.

use crate::action::Action;
use crate::state::{EventId, StateValue};
use serde::{Deserialize, Serialize};

/// A single transition step: source, event, target and its actions.
///
/// Extraction never produces a step whose target equals its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcStep {
    /// State the transition leaves
    pub source: StateValue,
    /// Triggering event type
    pub event: EventId,
    /// State the transition enters
    pub target: StateValue,
    /// Actions in execution order
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Resolved cost annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl RcStep {
    /// Create a new step without actions
    #[must_use]
    pub fn new(source: StateValue, event: impl Into<EventId>, target: StateValue) -> Self {
        Self {
            source,
            event: event.into(),
            target,
            actions: Vec::new(),
            cost: None,
        }
    }

    /// Set actions
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    /// Set the cost annotation
    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Canonical key of the source state
    #[must_use]
    pub fn source_key(&self) -> String {
        self.source.canonical_key()
    }

    /// Canonical key of the target state
    #[must_use]
    pub fn target_key(&self) -> String {
        self.target.canonical_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_builder() {
        let step = RcStep::new("closed".into(), "OPEN", "opened".into())
            .with_actions(vec![Action::typed("log")])
            .with_cost(2.0);
        assert_eq!(step.source_key(), "closed");
        assert_eq!(step.target_key(), "opened");
        assert_eq!(step.actions.len(), 1);
        assert_eq!(step.cost, Some(2.0));
    }

    #[test]
    fn test_step_deserializes_without_optional_fields() {
        let step: RcStep = serde_json::from_value(json!({
            "source": "a",
            "event": "GO",
            "target": {"b": "c"}
        }))
        .unwrap();
        assert!(step.actions.is_empty());
        assert_eq!(step.cost, None);
        assert_eq!(step.target_key(), r#"{"b":"c"}"#);
    }
}
