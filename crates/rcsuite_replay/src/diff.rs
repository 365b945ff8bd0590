//! Diffs between two configurations.

use rcsuite_core::{Configuration, StateValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Change to a single context key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextChange {
    /// Key that changed
    pub key: String,
    /// Old value (if any)
    pub old_value: Option<Value>,
    /// New value (if any)
    pub new_value: Option<Value>,
}

/// Difference between a configuration and a later one
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigDiff {
    /// `(before, after)` state values if the state changed
    pub state_change: Option<(StateValue, StateValue)>,
    /// Context keys only present after
    pub added: BTreeSet<String>,
    /// Context keys only present before
    pub removed: BTreeSet<String>,
    /// Every context key whose value differs, in key order
    pub changes: Vec<ContextChange>,
}

impl ConfigDiff {
    /// Create a new empty diff
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any differences
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.state_change.is_some() || !self.changes.is_empty()
    }

    /// Keys present on both sides with different values
    pub fn modified(&self) -> impl Iterator<Item = &str> {
        self.changes
            .iter()
            .filter(|c| c.old_value.is_some() && c.new_value.is_some())
            .map(|c| c.key.as_str())
    }

    /// Compute diff between two configurations
    #[must_use]
    pub fn compute(before: &Configuration, after: &Configuration) -> Self {
        let mut diff = Self::new();

        if before.state != after.state {
            diff.state_change = Some((before.state.clone(), after.state.clone()));
        }

        let keys: BTreeSet<&String> = before.context.keys().chain(after.context.keys()).collect();
        for key in keys {
            let old_value = before.context.get(key);
            let new_value = after.context.get(key);
            if old_value == new_value {
                continue;
            }
            match (old_value, new_value) {
                (None, Some(_)) => {
                    diff.added.insert(key.clone());
                }
                (Some(_), None) => {
                    diff.removed.insert(key.clone());
                }
                _ => {}
            }
            diff.changes.push(ContextChange {
                key: key.clone(),
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
            });
        }

        diff
    }
}
