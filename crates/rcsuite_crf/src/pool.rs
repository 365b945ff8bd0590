//! Default fault pools and constants.

use crate::trace::Payload;
use serde_json::json;

/// Per-index injection probability when none is configured
pub const DEFAULT_INJECTION_RATE: f64 = 0.1;

/// Timeout carried by missing-message markers
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Event identifier of a missing-message marker
pub const TIMEOUT_EVENT: &str = "TIMEOUT";

/// Sentinel event identifiers used for wrong-message injection
pub const DEFAULT_WRONG_MESSAGES: [&str; 8] = [
    "INVALID_EVENT",
    "UNKNOWN_ACTION",
    "MALFORMED_REQUEST",
    "UNEXPECTED_MESSAGE",
    "CORRUPTED_EVENT",
    "NULL_EVENT",
    "UNDEFINED_ACTION",
    "ERROR_EVENT",
];

/// Owned copy of [`DEFAULT_WRONG_MESSAGES`]
#[must_use]
pub fn default_wrong_messages() -> Vec<String> {
    DEFAULT_WRONG_MESSAGES.iter().map(ToString::to_string).collect()
}

/// Malformed payload shapes used for wrong-payload injection
#[must_use]
pub fn default_wrong_payloads() -> Vec<Payload> {
    vec![
        Payload::Json(json!(null)),
        Payload::Undefined,
        Payload::NaN,
        Payload::Infinity,
        Payload::NegInfinity,
        Payload::Json(json!({})),
        Payload::Json(json!([])),
        Payload::Json(json!("")),
        Payload::Json(json!({"corrupted": true, "data": {"nested": null}})),
        Payload::Json(json!({"id": null})),
        Payload::Json(json!({"id": -1})),
        Payload::Json(json!({"timestamp": "invalid-date"})),
        Payload::Json(json!({"count": -999_999})),
        Payload::Json(json!({"status": "INVALID_STATUS"})),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pools() {
        assert_eq!(default_wrong_messages().len(), 8);
        assert!(default_wrong_messages().contains(&"INVALID_EVENT".to_string()));

        let payloads = default_wrong_payloads();
        assert_eq!(payloads.len(), 14);
        assert!(payloads.contains(&Payload::NegInfinity));
        assert!(payloads.contains(&Payload::Json(json!({"count": -999_999}))));
    }
}
