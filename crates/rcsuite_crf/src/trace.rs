//! Recorded traces and per-event mutation provenance.

use crate::kind::CrfKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// An ordered recorded run
pub type Trace = Vec<TraceEvent>;

/// Message payload attached to a trace event.
///
/// JSON has no spelling for `undefined` or the IEEE non-finite values, yet
/// malformed payloads need them. They serialize as the bare strings
/// `"undefined"`, `"NaN"`, `"Infinity"` and `"-Infinity"`, and those exact
/// strings read back as the sentinel variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Any JSON value
    Json(Value),
    /// Absent value
    Undefined,
    /// Not a number
    NaN,
    /// Positive infinity
    Infinity,
    /// Negative infinity
    NegInfinity,
}

impl Payload {
    /// Empty mapping payload
    #[must_use]
    pub fn empty() -> Self {
        Self::Json(Value::Object(Map::new()))
    }

    /// Borrow the JSON value, if this is one
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    fn sentinel(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => None,
            Self::Undefined => Some("undefined"),
            Self::NaN => Some("NaN"),
            Self::Infinity => Some("Infinity"),
            Self::NegInfinity => Some("-Infinity"),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("undefined") => Self::Undefined,
            Some("NaN") => Self::NaN,
            Some("Infinity") => Self::Infinity,
            Some("-Infinity") => Self::NegInfinity,
            _ => Self::Json(value),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.sentinel()) {
            (Self::Json(value), _) => write!(f, "{value}"),
            (_, Some(name)) => f.write_str(name),
            (_, None) => Ok(()),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self, self.sentinel()) {
            (Self::Json(value), _) => value.serialize(serializer),
            (_, Some(name)) => serializer.serialize_str(name),
            (_, None) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Record of what a mutation replaced at one trace index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "crf")]
pub enum Provenance {
    /// Event identifier was swapped
    #[serde(rename = "WM")]
    WrongMessage {
        /// Event before mutation
        original_event: String,
    },
    /// Payload was swapped
    #[serde(rename = "WP")]
    WrongPayload {
        /// Payload before mutation
        original_message: Payload,
    },
    /// Event was replaced by a timeout marker
    #[serde(rename = "MM")]
    MissingMessage {
        /// Event before mutation
        original_event: String,
        /// Payload before mutation
        original_message: Payload,
        /// Timeout carried by the marker
        timeout_ms: u64,
    },
}

impl Provenance {
    /// Failure class that produced this record
    #[must_use]
    pub fn kind(&self) -> CrfKind {
        match self {
            Self::WrongMessage { .. } => CrfKind::WrongMessage,
            Self::WrongPayload { .. } => CrfKind::WrongPayload,
            Self::MissingMessage { .. } => CrfKind::MissingMessage,
        }
    }
}

/// One recorded event.
///
/// Fault records never go into `message`. An injected event keeps its
/// payload slot for the data under test and records the fault in the
/// sibling `provenance` field, serialized as
/// `{"crf": "WM", "original_event": ...}` and so on. Report consumers should
/// read `provenance` to tell mutated events apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Event identifier
    pub event: String,
    /// Event payload
    #[serde(default)]
    pub message: Payload,
    /// Set on events a mutation produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl TraceEvent {
    /// Create a new event with an empty payload
    #[must_use]
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            message: Payload::empty(),
            provenance: None,
        }
    }

    /// Set the payload
    #[must_use]
    pub fn with_message(mut self, message: impl Into<Payload>) -> Self {
        self.message = message.into();
        self
    }

    /// Check if a mutation touched this event
    #[must_use]
    pub fn is_mutated(&self) -> bool {
        self.provenance.is_some()
    }
}
