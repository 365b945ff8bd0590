//! RC-step extraction from a host machine's node hierarchy.

use crate::cost::resolve_actions_cost;
use rcsuite_core::{EventData, HostMachine, RcStep, StateNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Extraction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Annotate each step with the cost resolved from its actions
    pub annotate_costs: bool,
    /// Maximum nodes to visit (0 = unlimited)
    pub max_nodes: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            annotate_costs: false,
            max_nodes: 0,
        }
    }
}

/// Depth-first walker that turns own-event transitions into RC-steps
#[derive(Debug, Clone, Default)]
pub struct RcExtractor {
    config: ExtractConfig,
}

impl RcExtractor {
    /// Create a new extractor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable cost annotation
    #[must_use]
    pub fn with_cost_annotation(mut self, enabled: bool) -> Self {
        self.config.annotate_costs = enabled;
        self
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Walk the machine from its root and collect RC-steps.
    ///
    /// Every node is visited at most once, keyed by id, so cyclic child
    /// references terminate. For each node only its own events are tried.
    /// Transitions the host rejects are skipped, as are transitions that
    /// leave the state unchanged. Children are walked whether or not any
    /// transition reaches them.
    #[must_use]
    pub fn extract(&self, machine: &dyn HostMachine) -> Vec<RcStep> {
        let mut steps = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<&StateNode> = vec![machine.root()];

        while let Some(node) = stack.pop() {
            if self.config.max_nodes > 0 && visited.len() >= self.config.max_nodes {
                tracing::debug!(max_nodes = self.config.max_nodes, "node limit reached");
                break;
            }
            if !visited.insert(node.id.clone()) {
                continue;
            }

            for event in &node.own_events {
                match machine.transition(&node.value, &EventData::new(event.clone())) {
                    Ok(outcome) if outcome.value != node.value => {
                        let mut step = RcStep::new(node.value.clone(), event.clone(), outcome.value)
                            .with_actions(outcome.actions);
                        if self.config.annotate_costs {
                            step.cost = resolve_actions_cost(&step.actions);
                        }
                        steps.push(step);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::trace!(node = %node.id, %event, %err, "transition skipped");
                    }
                }
            }

            // Reverse so the first child is walked first.
            for child_id in node.states.values().rev() {
                match machine.node(child_id) {
                    Some(child) if !visited.contains(&child.id) => stack.push(child),
                    Some(_) => {}
                    None => {
                        tracing::trace!(node = %node.id, child = %child_id, "missing child node")
                    }
                }
            }
        }

        tracing::debug!(
            machine = machine.id(),
            nodes = visited.len(),
            steps = steps.len(),
            "extracted rc steps"
        );
        steps
    }
}

/// Extract RC-steps with the default configuration
#[must_use]
pub fn extract_rc(machine: &dyn HostMachine) -> Vec<RcStep> {
    RcExtractor::new().extract(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use rcsuite_core::{
        Action, Context, MachineError, StateValue, TableMachine, TransitionOutcome,
    };
    use serde_json::json;
    use std::sync::Mutex;

    fn turnstile() -> TableMachine {
        let definition = json!({
            "id": "turnstile",
            "initial": "locked",
            "states": {
                "locked": {"on": {
                    "COIN": {"target": "unlocked", "actions": [{"type": "setCost(2)"}]},
                    "PUSH": "locked"
                }},
                "unlocked": {"on": {
                    "PUSH": {"target": "locked", "actions": ["log", {"cost": 1}]},
                    "COIN": {"actions": ["refund"]}
                }}
            }
        });
        TableMachine::from_json(&definition.to_string()).unwrap()
    }

    /// Hand-built host with shared and cyclic child references.
    struct CyclicMachine {
        root: StateNode,
        nodes: IndexMap<String, StateNode>,
        calls: Mutex<Vec<String>>,
    }

    impl CyclicMachine {
        fn new() -> Self {
            let root = StateNode::new("root", "a".into())
                .with_event("GO")
                .with_child("a", "a")
                .with_child("b", "b");
            let a = StateNode::new("a", "a".into())
                .with_event("GO")
                .with_event("STAY")
                .with_child("back", "root")
                .with_child("self", "a")
                .with_child("ghost", "missing");
            let b = StateNode::new("b", "b".into())
                .with_event("GO")
                .with_event("BAD")
                .with_child("a", "a");
            let mut nodes = IndexMap::new();
            nodes.insert("a".to_string(), a);
            nodes.insert("b".to_string(), b);
            Self {
                root,
                nodes,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl HostMachine for CyclicMachine {
        fn id(&self) -> &str {
            "cyclic"
        }

        fn root(&self) -> &StateNode {
            &self.root
        }

        fn node(&self, id: &str) -> Option<&StateNode> {
            if id == "root" { Some(&self.root) } else { self.nodes.get(id) }
        }

        fn initial_state(&self) -> StateValue {
            "a".into()
        }

        fn context(&self) -> Option<&Context> {
            None
        }

        fn transition(
            &self,
            state: &StateValue,
            event: &EventData,
        ) -> Result<TransitionOutcome, MachineError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", state, event.event_type));
            let target = match (state.canonical_key().as_str(), event.event_type.as_str()) {
                ("a", "GO") => "b",
                ("a", "STAY") => "a",
                ("b", "GO") => "a",
                _ => {
                    return Err(MachineError::NoTransition {
                        state: state.canonical_key(),
                        event: event.event_type.clone(),
                    });
                }
            };
            Ok(TransitionOutcome {
                value: target.into(),
                actions: Vec::new(),
            })
        }
    }

    #[test]
    fn test_extract_turnstile() {
        let steps = extract_rc(&turnstile());
        let summary: Vec<(String, &str, String)> = steps
            .iter()
            .map(|s| (s.source_key(), s.event.as_str(), s.target_key()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("locked".to_string(), "COIN", "unlocked".to_string()),
                ("unlocked".to_string(), "PUSH", "locked".to_string()),
            ]
        );
        assert_eq!(steps[1].actions, vec![Action::literal("log"), Action::cost(1)]);
        assert!(steps.iter().all(|s| s.cost.is_none()));
    }

    #[test]
    fn test_extract_never_emits_self_loops() {
        let steps = extract_rc(&turnstile());
        assert!(steps.iter().all(|s| s.source != s.target));
    }

    #[test]
    fn test_extract_with_cost_annotation() {
        let steps = RcExtractor::new()
            .with_cost_annotation(true)
            .extract(&turnstile());
        let costs: Vec<Option<f64>> = steps.iter().map(|s| s.cost).collect();
        assert_eq!(costs, vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_extract_terminates_on_cycles() {
        let machine = CyclicMachine::new();
        let steps = extract_rc(&machine);

        // root, a and b each tried once; "missing" is ignored.
        let calls = machine.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["a:GO", "a:GO", "a:STAY", "b:GO", "b:BAD"]);

        let summary: Vec<(String, String)> = steps
            .iter()
            .map(|s| (s.source_key(), s.target_key()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn test_extract_node_limit() {
        let config = ExtractConfig {
            max_nodes: 1,
            ..Default::default()
        };
        let machine = CyclicMachine::new();
        let steps = RcExtractor::new().with_config(config).extract(&machine);
        assert_eq!(steps.len(), 1);
        assert_eq!(machine.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_walks_unreachable_children() {
        let definition = json!({
            "id": "m",
            "initial": "a",
            "states": {
                "a": {},
                "island": {"on": {"LEAVE": "a"}}
            }
        });
        let machine = TableMachine::from_json(&definition.to_string()).unwrap();
        let steps = extract_rc(&machine);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].source, StateValue::atomic("island"));
    }
}
