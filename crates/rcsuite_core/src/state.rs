//! State values, contexts and event records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Event type identifier
pub type EventId = String;

/// Extended state carried alongside a state value
pub type Context = Map<String, Value>;

/// Identifier of a (possibly compound or parallel) machine state.
///
/// Atomic states are flat strings. Compound states nest one mapping level
/// per hierarchy level, e.g. `{"active": "running"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Leaf state
    Atomic(String),
    /// Nested state mapping, sorted by key
    Compound(BTreeMap<String, StateValue>),
}

impl StateValue {
    /// Create an atomic state value
    #[must_use]
    pub fn atomic(name: impl Into<String>) -> Self {
        Self::Atomic(name.into())
    }

    /// Create a state value from a hierarchy path.
    ///
    /// `["a"]` is atomic `a`; `["a", "b"]` is `{"a": "b"}`. An empty path
    /// yields an empty compound value.
    #[must_use]
    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Self {
        match path {
            [] => Self::Compound(BTreeMap::new()),
            [leaf] => Self::Atomic(leaf.as_ref().to_string()),
            [head, rest @ ..] => {
                let mut map = BTreeMap::new();
                map.insert(head.as_ref().to_string(), Self::from_path(rest));
                Self::Compound(map)
            }
        }
    }

    /// Canonical string key used to index graph buckets.
    ///
    /// Atomic values pass through unchanged; compound values are rendered
    /// as compact JSON with keys in sorted order.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        match self {
            Self::Atomic(name) => name.clone(),
            Self::Compound(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Check whether this is an atomic value
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Atomic(_))
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_key())
    }
}

impl From<&str> for StateValue {
    fn from(name: &str) -> Self {
        Self::atomic(name)
    }
}

impl From<String> for StateValue {
    fn from(name: String) -> Self {
        Self::Atomic(name)
    }
}

/// Event record delivered to the transition oracle and to assign actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventId,
    /// Additional event fields
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl EventData {
    /// Create a synthetic event carrying only its type
    #[must_use]
    pub fn new(event_type: impl Into<EventId>) -> Self {
        Self {
            event_type: event_type.into(),
            data: Map::new(),
        }
    }

    /// Add a field to the event
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
