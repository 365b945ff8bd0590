//! Action descriptors attached to transitions.
//!
//! Host runtimes hand back loosely shaped action objects. They are classified
//! once, at ingestion, into an [`Action`] variant so the cost resolver and the
//! replay engine can match on shape instead of probing fields.

use crate::state::{Context, EventData};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Type identifier used for assign actions
pub const ASSIGN_ACTION_TYPE: &str = "xstate.assign";

/// Pure context transform: `(context, event) -> new context`
pub type AssignFn = Arc<dyn Fn(&Context, &EventData) -> Context + Send + Sync>;

/// Zero-argument executable; `Ok` carries its return value
pub type ExecFn = Arc<dyn Fn() -> Result<Value, ExecFault> + Send + Sync>;

/// Failure raised by an executable action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Action execution failed: {0}")]
pub struct ExecFault(pub String);

/// Effect descriptor for a transition
#[derive(Clone)]
pub enum Action {
    /// Assign whose return value replaces the context
    AssignFn(AssignFn),
    /// Assign whose object is shallow-merged into the context
    AssignPatch {
        /// Keys merged into the context
        patch: Context,
        /// Explicit `cost` field, if the descriptor had one
        cost: Option<Value>,
    },
    /// Action carrying an explicit `cost` field
    Cost {
        /// Type identifier, if the descriptor had one
        action_type: Option<String>,
        /// Raw cost value, coerced when resolved
        cost: Value,
    },
    /// Action identified only by its type string
    Typed(String),
    /// Bare string action
    Literal(String),
    /// Synchronous executable
    Exec(ExecFn),
    /// No recognized effect
    Plain,
}

impl Action {
    /// Create a function-backed assign action
    #[must_use]
    pub fn assign_fn<F>(f: F) -> Self
    where
        F: Fn(&Context, &EventData) -> Context + Send + Sync + 'static,
    {
        Self::AssignFn(Arc::new(f))
    }

    /// Create a patch assign action
    #[must_use]
    pub fn assign_patch(patch: Context) -> Self {
        Self::AssignPatch { patch, cost: None }
    }

    /// Create an action with an explicit cost
    #[must_use]
    pub fn cost(cost: impl Into<Value>) -> Self {
        Self::Cost {
            action_type: None,
            cost: cost.into(),
        }
    }

    /// Create a typed action
    #[must_use]
    pub fn typed(action_type: impl Into<String>) -> Self {
        Self::Typed(action_type.into())
    }

    /// Create a bare string action
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// Create an executable action
    #[must_use]
    pub fn exec<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, ExecFault> + Send + Sync + 'static,
    {
        Self::Exec(Arc::new(f))
    }

    /// Classify a raw JSON action descriptor.
    ///
    /// Strings become [`Action::Literal`]. Objects are checked for the assign
    /// shape (`type` of `xstate.assign` or `assign` with an object
    /// `assignment`), then for a `cost` key, then for a `type` key. An assign
    /// keeps its `cost` alongside the patch.
    /// Anything else is [`Action::Plain`].
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(name) => Self::Literal(name.clone()),
            Value::Object(map) => {
                let action_type = map.get("type").map(stringify);
                if matches!(action_type.as_deref(), Some(ASSIGN_ACTION_TYPE) | Some("assign")) {
                    if let Some(Value::Object(patch)) = map.get("assignment") {
                        return Self::AssignPatch {
                            patch: patch.clone(),
                            cost: map.get("cost").cloned(),
                        };
                    }
                }
                if let Some(cost) = map.get("cost") {
                    return Self::Cost {
                        action_type,
                        cost: cost.clone(),
                    };
                }
                match action_type {
                    Some(action_type) => Self::Typed(action_type),
                    None => Self::Plain,
                }
            }
            _ => Self::Plain,
        }
    }

    /// Render the descriptor back to JSON.
    ///
    /// Function-backed variants keep only their type marker.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        match self {
            Self::AssignFn(_) => {
                map.insert("type".into(), Value::from(ASSIGN_ACTION_TYPE));
            }
            Self::AssignPatch { patch, cost } => {
                map.insert("type".into(), Value::from(ASSIGN_ACTION_TYPE));
                map.insert("assignment".into(), Value::Object(patch.clone()));
                if let Some(cost) = cost {
                    map.insert("cost".into(), cost.clone());
                }
            }
            Self::Cost { action_type, cost } => {
                if let Some(action_type) = action_type {
                    map.insert("type".into(), Value::from(action_type.as_str()));
                }
                map.insert("cost".into(), cost.clone());
            }
            Self::Typed(action_type) => {
                map.insert("type".into(), Value::from(action_type.as_str()));
            }
            Self::Literal(name) => return Value::from(name.as_str()),
            Self::Exec(_) => {
                map.insert("type".into(), Value::from("exec"));
            }
            Self::Plain => {}
        }
        Value::Object(map)
    }

    /// Type identifier of the descriptor, if it has one
    #[must_use]
    pub fn type_id(&self) -> Option<&str> {
        match self {
            Self::AssignFn(_) | Self::AssignPatch { .. } => Some(ASSIGN_ACTION_TYPE),
            Self::Cost { action_type, .. } => action_type.as_deref(),
            Self::Typed(action_type) => Some(action_type),
            Self::Literal(_) | Self::Exec(_) | Self::Plain => None,
        }
    }

    /// Check whether the action changes context on replay
    #[must_use]
    pub fn is_assign(&self) -> bool {
        matches!(self, Self::AssignFn(_) | Self::AssignPatch { .. })
    }

    /// Raw explicit cost carried by the descriptor
    #[must_use]
    pub fn explicit_cost(&self) -> Option<&Value> {
        match self {
            Self::Cost { cost, .. } => Some(cost),
            Self::AssignPatch { cost, .. } => cost.as_ref(),
            _ => None,
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssignFn(_) => f.write_str("AssignFn(<fn>)"),
            Self::AssignPatch { patch, cost } => f
                .debug_struct("AssignPatch")
                .field("patch", patch)
                .field("cost", cost)
                .finish(),
            Self::Cost { action_type, cost } => f
                .debug_struct("Cost")
                .field("action_type", action_type)
                .field("cost", cost)
                .finish(),
            Self::Typed(action_type) => f.debug_tuple("Typed").field(action_type).finish(),
            Self::Literal(name) => f.debug_tuple("Literal").field(name).finish(),
            Self::Exec(_) => f.write_str("Exec(<fn>)"),
            Self::Plain => f.write_str("Plain"),
        }
    }
}

// Function-backed variants compare by identity.
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AssignFn(a), Self::AssignFn(b)) => Arc::ptr_eq(a, b),
            (
                Self::AssignPatch { patch: pa, cost: ca },
                Self::AssignPatch { patch: pb, cost: cb },
            ) => pa == pb && ca == cb,
            (
                Self::Cost { action_type: ta, cost: ca },
                Self::Cost { action_type: tb, cost: cb },
            ) => ta == tb && ca == cb,
            (Self::Typed(a), Self::Typed(b)) => a == b,
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Exec(a), Self::Exec(b)) => Arc::ptr_eq(a, b),
            (Self::Plain, Self::Plain) => true,
            _ => false,
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_json(&value))
    }
}
