//! Cost resolution for RC-steps.
//!
//! Costs come from the first action, in list order, that matches any of
//! these rules (checked in this order on each action):
//!
//! 1. an explicit `cost` field, coerced to a number;
//! 2. a type identifier containing `setCost` followed by `:` or whitespace
//!    and a signed integer (`setCost:5`, `SETCOST -3`);
//! 3. a type identifier containing the call form `setCost(N)`;
//! 4. a bare string action containing the call form `setCost(N)`;
//! 5. an executable returning a number. A failing executable is skipped.
//!
//! Matching is case-insensitive and unanchored. If no action yields a cost
//! the step's own `cost` annotation is used, else 0.

use once_cell::sync::Lazy;
use rcsuite_core::{Action, Configuration, RcStep};
use regex::Regex;
use serde_json::Value;

static TYPE_COST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)setcost[:\s]\s*([+-]?\d+)").expect("type cost pattern"));

static CALL_COST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)setcost\(([+-]?\d+)\)").expect("call cost pattern"));

fn capture_int(pattern: &Regex, text: &str) -> Option<i64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse the colon/space form, e.g. `setCost:5`
#[must_use]
pub fn parse_type_cost(text: &str) -> Option<i64> {
    capture_int(&TYPE_COST, text)
}

/// Parse the call form, e.g. `setCost(5)`
#[must_use]
pub fn parse_call_cost(text: &str) -> Option<i64> {
    capture_int(&CALL_COST, text)
}

/// Coerce an explicit `cost` field to a number.
///
/// Numbers pass through, numeric strings are parsed, booleans become 1/0.
/// Everything else, and any non-finite result, is 0.
#[must_use]
pub fn coerce_cost(value: &Value) -> f64 {
    let cost = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if cost.is_finite() { cost } else { 0.0 }
}

/// Cost carried by a single action, if any rule matches
#[must_use]
pub fn resolve_action_cost(action: &Action) -> Option<f64> {
    if let Some(cost) = action.explicit_cost() {
        return Some(coerce_cost(cost));
    }

    if let Some(action_type) = action.type_id() {
        if let Some(cost) = parse_type_cost(action_type).or_else(|| parse_call_cost(action_type)) {
            return Some(cost as f64);
        }
    }

    match action {
        Action::Literal(name) => parse_call_cost(name).map(|cost| cost as f64),
        Action::Exec(run) => match run() {
            Ok(value) => value.as_f64(),
            Err(fault) => {
                tracing::trace!(%fault, "executable action failed during cost lookup");
                None
            }
        },
        _ => None,
    }
}

/// Cost of the first action that carries one
#[must_use]
pub fn resolve_actions_cost(actions: &[Action]) -> Option<f64> {
    actions.iter().find_map(resolve_action_cost)
}

/// Cost of taking `step` from configuration `config`.
///
/// The configuration does not currently influence the result; it is part
/// of the signature so callers price steps relative to where they stand.
#[must_use]
pub fn get_cost(_config: &Configuration, step: &RcStep) -> f64 {
    resolve_actions_cost(&step.actions)
        .or(step.cost)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcsuite_core::{Context, ExecFault, HostMachine, TableMachine};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn config() -> Configuration {
        let definition = json!({"id": "m", "initial": "a", "states": {"a": {}, "b": {}}});
        let machine: Arc<dyn HostMachine> =
            Arc::new(TableMachine::from_json(&definition.to_string()).unwrap());
        Configuration::new(machine, "a".into(), Context::new())
    }

    fn step(actions: Vec<Action>) -> RcStep {
        RcStep::new("a".into(), "GO", "b".into()).with_actions(actions)
    }

    #[test]
    fn test_first_matching_action_wins() {
        let actions = vec![Action::typed("noop"), Action::cost(7), Action::typed("setCost(99)")];
        assert_eq!(get_cost(&config(), &step(actions)), 7.0);
    }

    #[test]
    fn test_explicit_cost_coerced() {
        assert_eq!(get_cost(&config(), &step(vec![Action::cost("12")])), 12.0);
        assert_eq!(get_cost(&config(), &step(vec![Action::cost("lots")])), 0.0);
        assert_eq!(get_cost(&config(), &step(vec![Action::cost(true)])), 1.0);
        assert_eq!(get_cost(&config(), &step(vec![Action::cost(Value::Null)])), 0.0);
    }

    #[test]
    fn test_non_numeric_cost_is_not_skipped() {
        let actions = vec![Action::cost("oops"), Action::cost(5)];
        assert_eq!(get_cost(&config(), &step(actions)), 0.0);
    }

    #[test]
    fn test_type_encoded_colon_form() {
        assert_eq!(parse_type_cost("setCost:5"), Some(5));
        assert_eq!(parse_type_cost("SETCOST -3"), Some(-3));
        assert_eq!(parse_type_cost("ui.setcost: +8"), Some(8));
        assert_eq!(parse_type_cost("setCost5"), None);
        let actions = vec![Action::typed("setCost:4")];
        assert_eq!(get_cost(&config(), &step(actions)), 4.0);
    }

    #[test]
    fn test_type_encoded_call_form() {
        assert_eq!(parse_call_cost("setCost(12)"), Some(12));
        assert_eq!(parse_call_cost("do.SetCost(-2)"), Some(-2));
        assert_eq!(parse_call_cost("setCost( 2 )"), None);
        let actions = vec![Action::typed("setCost(9)")];
        assert_eq!(get_cost(&config(), &step(actions)), 9.0);
    }

    #[test]
    fn test_literal_accepts_call_form_only() {
        let actions = vec![Action::literal("setCost:3"), Action::literal("setCost(6)")];
        assert_eq!(get_cost(&config(), &step(actions)), 6.0);
    }

    #[test]
    fn test_typed_cost_descriptor_uses_field_first() {
        let action = Action::Cost {
            action_type: Some("setCost(50)".to_string()),
            cost: json!(2),
        };
        assert_eq!(resolve_action_cost(&action), Some(2.0));
    }

    #[test]
    fn test_executable_cost() {
        let actions = vec![Action::exec(|| Ok(json!(3.5)))];
        assert_eq!(get_cost(&config(), &step(actions)), 3.5);
    }

    #[test]
    fn test_failing_executable_continues_scan() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let actions = vec![
            Action::exec(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ExecFault("boom".to_string()))
            }),
            Action::exec(|| Ok(json!("not a number"))),
            Action::typed("setCost(4)"),
        ];
        assert_eq!(get_cost(&config(), &step(actions)), 4.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallback_to_step_cost_then_zero() {
        let annotated = step(vec![Action::typed("log")]).with_cost(11.0);
        assert_eq!(get_cost(&config(), &annotated), 11.0);
        assert_eq!(get_cost(&config(), &step(Vec::new())), 0.0);
    }

    #[test]
    fn test_assign_actions_carry_no_cost() {
        let actions = vec![Action::assign_patch(Context::new()), Action::Plain];
        assert_eq!(resolve_actions_cost(&actions), None);
    }

    #[test]
    fn test_assign_with_explicit_cost() {
        let assign = Action::from_json(&json!({
            "type": "xstate.assign",
            "assignment": {"n": 1},
            "cost": 5
        }));
        assert_eq!(resolve_action_cost(&assign), Some(5.0));
        let actions = vec![assign, Action::cost(9)];
        assert_eq!(get_cost(&config(), &step(actions)), 5.0);
    }

    proptest::proptest! {
        #[test]
        fn prop_type_encoded_costs_parse(n in -1_000_000i64..1_000_000) {
            proptest::prop_assert_eq!(parse_type_cost(&format!("setCost:{n}")), Some(n));
            proptest::prop_assert_eq!(parse_call_cost(&format!("setCost({n})")), Some(n));
            proptest::prop_assert_eq!(coerce_cost(&json!(format!(" {n} "))), n as f64);
        }
    }
}
