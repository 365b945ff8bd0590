//! Declarative host machine compiled from a JSON transition table.
//!
//! ```json
//! {
//!   "id": "door",
//!   "initial": "closed",
//!   "context": {"opens": 0},
//!   "states": {
//!     "closed": {"on": {"OPEN": {"target": "opened", "actions": [{"cost": 2}]}}},
//!     "opened": {"on": {"CLOSE": "closed"}}
//!   }
//! }
//! ```
//!
//! Targets are dot-separated paths from the machine root. Events resolve
//! from the deepest active node outward, so children inherit their
//! ancestors' handlers. Parallel regions are not supported.

use crate::action::Action;
use crate::error::{CoreError, CoreResult, MachineError};
use crate::machine::{HostMachine, StateNode, TransitionOutcome};
use crate::state::{Context, EventData, StateValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level machine definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    /// Machine id, also the root node id
    pub id: String,
    /// Initial child of the root
    pub initial: String,
    /// Initial context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Handlers declared on the root
    #[serde(default)]
    pub on: IndexMap<String, TransitionDefinition>,
    /// Top-level states
    #[serde(default)]
    pub states: IndexMap<String, StateDefinition>,
}

/// Definition of a single state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    /// Initial child for compound states
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    /// Handlers declared on this state
    #[serde(default)]
    pub on: IndexMap<String, TransitionDefinition>,
    /// Child states
    #[serde(default)]
    pub states: IndexMap<String, StateDefinition>,
}

/// Transition handler: a bare target path or a target with actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionDefinition {
    /// Target path only
    Target(String),
    /// Optional target plus actions; no target means stay in place
    Detailed {
        /// Target path
        #[serde(default)]
        target: Option<String>,
        /// Actions in execution order
        #[serde(default)]
        actions: Vec<Action>,
    },
}

impl TransitionDefinition {
    fn target(&self) -> Option<&str> {
        match self {
            Self::Target(target) => Some(target),
            Self::Detailed { target, .. } => target.as_deref(),
        }
    }

    fn actions(&self) -> Vec<Action> {
        match self {
            Self::Target(_) => Vec::new(),
            Self::Detailed { actions, .. } => actions.clone(),
        }
    }
}

/// Host machine backed by a [`MachineDefinition`]
#[derive(Debug, Clone)]
pub struct TableMachine {
    definition: MachineDefinition,
    root: StateNode,
    nodes: IndexMap<String, StateNode>,
    initial: StateValue,
}

impl TableMachine {
    /// Parse and compile a JSON definition
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the definition is invalid
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let definition: MachineDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Compile a definition into a node arena
    ///
    /// # Errors
    ///
    /// Returns error if an initial state or a target does not exist
    pub fn from_definition(definition: MachineDefinition) -> CoreResult<Self> {
        let root_id = definition.id.clone();
        let mut machine = Self {
            definition,
            root: StateNode::new(root_id.clone(), StateValue::from_path::<String>(&[])),
            nodes: IndexMap::new(),
            initial: StateValue::from_path::<String>(&[]),
        };

        let initial_path = machine.enter(vec![machine.definition.initial.clone()])?;
        machine.initial = StateValue::from_path(&initial_path);
        machine.validate_targets()?;

        let mut root = StateNode::new(root_id.clone(), machine.initial.clone());
        root.own_events = machine.definition.on.keys().cloned().collect();
        for key in machine.definition.states.keys() {
            root = root.with_child(key.clone(), format!("{}.{}", root_id, key));
        }
        machine.root = root;

        let mut stack: Vec<Vec<String>> = machine
            .definition
            .states
            .keys()
            .rev()
            .map(|key| vec![key.clone()])
            .collect();
        while let Some(path) = stack.pop() {
            let node = machine.build_node(&path)?;
            if let Some(def) = machine.lookup(&path) {
                for key in def.states.keys().rev() {
                    let mut child = path.clone();
                    child.push(key.clone());
                    stack.push(child);
                }
            }
            machine.nodes.insert(node.id.clone(), node);
        }

        Ok(machine)
    }

    /// Get the source definition
    #[must_use]
    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    /// Iterate over all nodes in hierarchy order, root first
    pub fn nodes(&self) -> impl Iterator<Item = &StateNode> {
        std::iter::once(&self.root).chain(self.nodes.values())
    }

    fn node_id(&self, path: &[String]) -> String {
        let mut id = self.definition.id.clone();
        for segment in path {
            id.push('.');
            id.push_str(segment);
        }
        id
    }

    fn build_node(&self, path: &[String]) -> CoreResult<StateNode> {
        let def = self.lookup(path).ok_or_else(|| CoreError::NotFound {
            kind: "State".to_string(),
            id: path.join("."),
        })?;
        let entered = self.enter(path.to_vec())?;
        let id = self.node_id(path);
        let mut node = StateNode::new(id.clone(), StateValue::from_path(&entered));
        node.own_events = def.on.keys().cloned().collect();
        for key in def.states.keys() {
            node = node.with_child(key.clone(), format!("{}.{}", id, key));
        }
        Ok(node)
    }

    fn lookup(&self, path: &[String]) -> Option<&StateDefinition> {
        let (first, rest) = path.split_first()?;
        let mut def = self.definition.states.get(first)?;
        for segment in rest {
            def = def.states.get(segment)?;
        }
        Some(def)
    }

    /// Extend a path through `initial` children down to a leaf.
    fn enter(&self, mut path: Vec<String>) -> Result<Vec<String>, MachineError> {
        loop {
            let def = self
                .lookup(&path)
                .ok_or_else(|| MachineError::UnknownState(path.join(".")))?;
            if def.states.is_empty() {
                return Ok(path);
            }
            let child = match &def.initial {
                Some(initial) => initial.clone(),
                None => def.states.keys().next().cloned().unwrap_or_default(),
            };
            path.push(child);
        }
    }

    fn validate_targets(&self) -> CoreResult<()> {
        let mut handlers: Vec<(&String, &TransitionDefinition)> =
            self.definition.on.iter().collect();
        let mut stack: Vec<&StateDefinition> = self.definition.states.values().collect();
        while let Some(def) = stack.pop() {
            handlers.extend(def.on.iter());
            stack.extend(def.states.values());
        }

        for (event, handler) in handlers {
            if let Some(target) = handler.target() {
                let path = split_target(target);
                if self.lookup(&path).is_none() {
                    return Err(MachineError::UnknownTarget {
                        target: target.to_string(),
                        event: event.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn active_path(state: &StateValue) -> Result<Vec<String>, MachineError> {
        let mut path = Vec::new();
        let mut current = state;
        loop {
            match current {
                StateValue::Atomic(name) => {
                    path.push(name.clone());
                    return Ok(path);
                }
                StateValue::Compound(map) => match (map.len(), map.iter().next()) {
                    (1, Some((key, child))) => {
                        path.push(key.clone());
                        current = child;
                    }
                    _ => return Err(MachineError::Unsupported(state.canonical_key())),
                },
            }
        }
    }
}

fn split_target(target: &str) -> Vec<String> {
    target.split('.').map(str::to_string).collect()
}

impl HostMachine for TableMachine {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn root(&self) -> &StateNode {
        &self.root
    }

    fn node(&self, id: &str) -> Option<&StateNode> {
        if id == self.root.id {
            Some(&self.root)
        } else {
            self.nodes.get(id)
        }
    }

    fn initial_state(&self) -> StateValue {
        self.initial.clone()
    }

    fn context(&self) -> Option<&Context> {
        self.definition.context.as_ref()
    }

    fn transition(
        &self,
        state: &StateValue,
        event: &EventData,
    ) -> Result<TransitionOutcome, MachineError> {
        let path = Self::active_path(state)?;
        if self.lookup(&path).is_none() {
            return Err(MachineError::UnknownState(state.canonical_key()));
        }

        for depth in (0..=path.len()).rev() {
            let handlers = if depth == 0 {
                &self.definition.on
            } else {
                match self.lookup(&path[..depth]) {
                    Some(def) => &def.on,
                    None => continue,
                }
            };
            let Some(handler) = handlers.get(&event.event_type) else {
                continue;
            };

            let value = match handler.target() {
                Some(target) => StateValue::from_path(&self.enter(split_target(target))?),
                None => state.clone(),
            };
            return Ok(TransitionOutcome {
                value,
                actions: handler.actions(),
            });
        }

        Err(MachineError::NoTransition {
            state: state.canonical_key(),
            event: event.event_type.clone(),
        })
    }
}
