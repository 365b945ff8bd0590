//! Fault injection strategies.
//!
//! Every function takes the generator explicitly. Caller traces are only
//! read; each mutant owns fresh copies of both its original and mutated
//! traces.

use crate::config::MutationConfig;
use crate::error::CrfResult;
use crate::kind::CrfKind;
use crate::pool::TIMEOUT_EVENT;
use crate::trace::{Payload, Provenance, Trace, TraceEvent};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;

/// A fault-injected trace variant.
///
/// Each index in `injection_points` carries a [`Provenance`] on its
/// `mutated_trace` event; payloads are not annotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutant {
    /// Copy of the input trace
    pub original_trace: Trace,
    /// Trace with faults injected
    pub mutated_trace: Trace,
    /// Ascending, duplicate-free mutated indices
    pub injection_points: Vec<usize>,
    /// Failure class; compound mutants always report `WM`
    pub crf_type: CrfKind,
    /// True when at least one fault was injected
    pub expected_bad_state: bool,
}

impl Mutant {
    fn new(original: &[TraceEvent], mutated: Trace, points: Vec<usize>, kind: CrfKind) -> Self {
        Self {
            original_trace: original.to_vec(),
            mutated_trace: mutated,
            expected_bad_state: !points.is_empty(),
            injection_points: points,
            crf_type: kind,
        }
    }

    /// Number of injected indices
    #[must_use]
    pub fn injection_count(&self) -> usize {
        self.injection_points.len()
    }

    /// Failure classes recorded on the injected events
    #[must_use]
    pub fn injected_kinds(&self) -> BTreeSet<CrfKind> {
        self.injection_points
            .iter()
            .filter_map(|&i| self.mutated_trace.get(i))
            .filter_map(|event| event.provenance.as_ref().map(Provenance::kind))
            .collect()
    }
}

/// Pick the indices of a trace of length `len` to mutate.
///
/// Explicit positions are used as given, minus out-of-range entries.
/// Otherwise each index is kept with probability
/// [`MutationConfig::effective_rate`]; if nothing was kept from a non-empty
/// trace at a positive rate, one uniform index is forced.
pub fn select_positions<R: Rng + ?Sized>(
    len: usize,
    config: &MutationConfig,
    rng: &mut R,
) -> Vec<usize> {
    if let Some(explicit) = &config.injection_positions {
        let positions: BTreeSet<usize> = explicit.iter().copied().filter(|&i| i < len).collect();
        return positions.into_iter().collect();
    }

    let rate = config.effective_rate();
    let mut positions: Vec<usize> = (0..len).filter(|_| rng.r#gen::<f64>() < rate).collect();
    if positions.is_empty() && len > 0 && rate > 0.0 {
        positions.push(rng.gen_range(0..len));
    }
    positions
}

fn pick<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Option<&'a T> {
    if pool.is_empty() {
        None
    } else {
        pool.get(rng.gen_range(0..pool.len()))
    }
}

/// Replace event identifiers with picks from the wrong-message pool.
///
/// The payload is kept as is. The original identifier goes in the event's
/// `provenance`.
pub fn wrong_message<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    config: &MutationConfig,
    rng: &mut R,
) -> Mutant {
    let points = select_positions(trace.len(), config, rng);
    let pool = config.message_pool();
    let mut mutated = trace.to_vec();

    for &i in &points {
        let Some(replacement) = pick(&pool, rng) else {
            continue;
        };
        let original = &trace[i];
        mutated[i] = TraceEvent {
            event: replacement.clone(),
            message: original.message.clone(),
            provenance: Some(Provenance::WrongMessage {
                original_event: original.event.clone(),
            }),
        };
    }

    tracing::debug!(points = points.len(), len = trace.len(), "WM mutant");
    Mutant::new(trace, mutated, points, CrfKind::WrongMessage)
}

/// Replace payloads with picks from the wrong-payload pool
pub fn wrong_payload<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    config: &MutationConfig,
    rng: &mut R,
) -> Mutant {
    let points = select_positions(trace.len(), config, rng);
    let pool = config.payload_pool();
    let mut mutated = trace.to_vec();

    for &i in &points {
        let Some(replacement) = pick(&pool, rng) else {
            continue;
        };
        let original = &trace[i];
        mutated[i] = TraceEvent {
            event: original.event.clone(),
            message: replacement.clone(),
            provenance: Some(Provenance::WrongPayload {
                original_message: original.message.clone(),
            }),
        };
    }

    tracing::debug!(points = points.len(), len = trace.len(), "WP mutant");
    Mutant::new(trace, mutated, points, CrfKind::WrongPayload)
}

/// Substitute selected events with timeout markers, keeping the length
pub fn missing_message<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    config: &MutationConfig,
    rng: &mut R,
) -> Mutant {
    let points = select_positions(trace.len(), config, rng);
    let mut mutated = trace.to_vec();

    for &i in &points {
        let original = &trace[i];
        mutated[i] = TraceEvent {
            event: TIMEOUT_EVENT.to_string(),
            message: Payload::Json(json!({ "timeout": config.timeout_ms })),
            provenance: Some(Provenance::MissingMessage {
                original_event: original.event.clone(),
                original_message: original.message.clone(),
                timeout_ms: config.timeout_ms,
            }),
        };
    }

    tracing::debug!(points = points.len(), len = trace.len(), "MM mutant");
    Mutant::new(trace, mutated, points, CrfKind::MissingMessage)
}

/// Apply one failure class
pub fn generate_mutant<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    kind: CrfKind,
    config: &MutationConfig,
    rng: &mut R,
) -> Mutant {
    match kind {
        CrfKind::WrongMessage => wrong_message(trace, config, rng),
        CrfKind::WrongPayload => wrong_payload(trace, config, rng),
        CrfKind::MissingMessage => missing_message(trace, config, rng),
    }
}

/// Apply the failure class named by a `WM`/`WP`/`MM` tag
///
/// # Errors
///
/// Returns [`crate::CrfError::UnknownKind`] for any other name
pub fn generate_mutant_by_name<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    name: &str,
    config: &MutationConfig,
    rng: &mut R,
) -> CrfResult<Mutant> {
    let kind = name.parse()?;
    Ok(generate_mutant(trace, kind, config, rng))
}

/// Apply several failure classes in order, each on the previous output.
///
/// The configured rate is split evenly across the kinds. The result's
/// `crf_type` is always `WM`; use [`Mutant::injected_kinds`] for the
/// classes that actually landed.
pub fn compound_mutant<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    kinds: &[CrfKind],
    config: &MutationConfig,
    rng: &mut R,
) -> Mutant {
    let mut current = trace.to_vec();
    let mut points = BTreeSet::new();

    if !kinds.is_empty() {
        let round_config = config
            .clone()
            .with_injection_rate(config.effective_rate() / kinds.len() as f64);
        for &kind in kinds {
            let round = generate_mutant(&current, kind, &round_config, rng);
            points.extend(round.injection_points);
            current = round.mutated_trace;
        }
    }

    tracing::debug!(kinds = kinds.len(), points = points.len(), "compound mutant");
    Mutant::new(trace, current, points.into_iter().collect(), CrfKind::WrongMessage)
}

/// Generate `count` independent mutants of the same trace
pub fn batch_generate_mutants<R: Rng + ?Sized>(
    trace: &[TraceEvent],
    count: usize,
    kind: CrfKind,
    config: &MutationConfig,
    rng: &mut R,
) -> Vec<Mutant> {
    (0..count)
        .map(|_| generate_mutant(trace, kind, config, &mut *rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrfError;
    use crate::pool::default_wrong_payloads;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_close() -> Trace {
        vec![TraceEvent::new("OPEN"), TraceEvent::new("CLOSE")]
    }

    fn sample_trace(len: usize) -> Trace {
        (0..len)
            .map(|i| TraceEvent::new(format!("E{i}")).with_message(json!({ "seq": i })))
            .collect()
    }

    fn arb_trace() -> impl Strategy<Value = Trace> {
        prop::collection::vec(("[A-Z]{1,6}", 0u32..100), 0..16).prop_map(|events| {
            events
                .into_iter()
                .map(|(event, n)| TraceEvent::new(event).with_message(json!({ "n": n })))
                .collect()
        })
    }

    fn arb_kind() -> impl Strategy<Value = CrfKind> {
        prop::sample::select(CrfKind::ALL.to_vec())
    }

    #[test]
    fn test_wrong_message_explicit_position() {
        let trace = open_close();
        let config = MutationConfig::new()
            .with_injection_positions(vec![1])
            .with_wrong_messages(["BOOM"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mutant = generate_mutant(&trace, CrfKind::WrongMessage, &config, &mut rng);

        assert_eq!(mutant.mutated_trace[1].event, "BOOM");
        assert_eq!(mutant.injection_points, vec![1]);
        assert!(mutant.expected_bad_state);
        assert_eq!(mutant.mutated_trace[0], trace[0]);
        assert_eq!(mutant.original_trace, trace);
        assert_eq!(
            mutant.mutated_trace[1].provenance,
            Some(Provenance::WrongMessage { original_event: "CLOSE".into() })
        );
    }

    #[test]
    fn test_explicit_positions_filtered_and_sorted() {
        let config = MutationConfig::new().with_injection_positions(vec![4, 1, 9, 1, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(select_positions(5, &config, &mut rng), vec![0, 1, 4]);

        let out_of_range = MutationConfig::new().with_injection_positions(vec![7]);
        let mutant = wrong_payload(&sample_trace(3), &out_of_range, &mut rng);
        assert!(mutant.injection_points.is_empty());
        assert!(!mutant.expected_bad_state);
        assert_eq!(mutant.mutated_trace, mutant.original_trace);
    }

    #[test]
    fn test_zero_rate_selects_nothing() {
        let config = MutationConfig::new().with_injection_rate(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(select_positions(10, &config, &mut rng).is_empty());
    }

    #[test]
    fn test_full_rate_selects_everything() {
        let config = MutationConfig::new().with_injection_rate(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(select_positions(4, &config, &mut rng), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_trace() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mutant = missing_message(&[], &MutationConfig::new(), &mut rng);
        assert!(mutant.mutated_trace.is_empty());
        assert!(!mutant.expected_bad_state);
    }

    #[test]
    fn test_wrong_payload_keeps_event() {
        let trace = sample_trace(3);
        let config = MutationConfig::new().with_injection_positions(vec![2]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mutant = wrong_payload(&trace, &config, &mut rng);

        let event = &mutant.mutated_trace[2];
        assert_eq!(event.event, "E2");
        assert!(default_wrong_payloads().contains(&event.message));
        assert_eq!(
            event.provenance,
            Some(Provenance::WrongPayload { original_message: Payload::Json(json!({"seq": 2})) })
        );
    }

    #[test]
    fn test_missing_message_marker() {
        let trace = sample_trace(3);
        let config = MutationConfig::new()
            .with_injection_positions(vec![0])
            .with_timeout_ms(250);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mutant = missing_message(&trace, &config, &mut rng);

        assert_eq!(mutant.mutated_trace.len(), 3);
        assert_eq!(mutant.mutated_trace[0].event, TIMEOUT_EVENT);
        assert_eq!(mutant.mutated_trace[0].message, Payload::Json(json!({"timeout": 250})));
        assert_eq!(mutant.crf_type, CrfKind::MissingMessage);
    }

    #[test]
    fn test_wrong_message_annotates_provenance_not_payload() {
        let trace = sample_trace(3);
        let config = MutationConfig::new()
            .with_injection_positions(vec![1])
            .with_wrong_messages(vec!["BOOM".to_string()]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mutant = wrong_message(&trace, &config, &mut rng);

        let value = serde_json::to_value(&mutant.mutated_trace[1]).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "BOOM",
                "message": {"seq": 1},
                "provenance": {"crf": "WM", "original_event": "E1"}
            })
        );
    }

    #[test]
    fn test_generate_mutant_by_name() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let trace = sample_trace(4);
        let config = MutationConfig::new();
        let mutant = generate_mutant_by_name(&trace, "MM", &config, &mut rng).unwrap();
        assert_eq!(mutant.crf_type, CrfKind::MissingMessage);

        let err = generate_mutant_by_name(&trace, "XX", &config, &mut rng).unwrap_err();
        assert_eq!(err, CrfError::UnknownKind("XX".into()));
    }

    #[test]
    fn test_compound_tags_wm_and_keeps_provenance() {
        let trace = sample_trace(4);
        let config = MutationConfig::new().with_injection_positions(vec![1, 3]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mutant = compound_mutant(
            &trace,
            &[CrfKind::WrongPayload, CrfKind::MissingMessage],
            &config,
            &mut rng,
        );

        assert_eq!(mutant.crf_type, CrfKind::WrongMessage);
        assert_eq!(mutant.injection_points, vec![1, 3]);
        assert_eq!(mutant.mutated_trace[1].event, TIMEOUT_EVENT);
        assert_eq!(
            mutant.injected_kinds().into_iter().collect::<Vec<_>>(),
            vec![CrfKind::MissingMessage]
        );
        assert_eq!(mutant.original_trace, trace);
    }

    #[test]
    fn test_compound_without_kinds_is_copy() {
        let trace = sample_trace(3);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mutant = compound_mutant(&trace, &[], &MutationConfig::new(), &mut rng);
        assert_eq!(mutant.mutated_trace, trace);
        assert!(mutant.injection_points.is_empty());
        assert!(!mutant.expected_bad_state);
    }

    #[test]
    fn test_batch_same_seed_is_deterministic() {
        let trace = sample_trace(20);
        let config = MutationConfig::new().with_injection_rate(0.3);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            batch_generate_mutants(&trace, 5, CrfKind::WrongMessage, &config, &mut rng)
        };
        let a = run(99);
        let b = run(99);
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_original_is_untouched(
            trace in arb_trace(),
            kind in arb_kind(),
            seed in any::<u64>(),
            rate in 0.0f64..=1.0,
        ) {
            let config = MutationConfig::new().with_injection_rate(rate);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutant = generate_mutant(&trace, kind, &config, &mut rng);
            prop_assert_eq!(&mutant.original_trace, &trace);
            prop_assert_eq!(mutant.mutated_trace.len(), trace.len());
            for (i, event) in mutant.mutated_trace.iter().enumerate() {
                if !mutant.injection_points.contains(&i) {
                    prop_assert_eq!(event, &trace[i]);
                }
            }
        }

        #[test]
        fn prop_points_sorted_unique_in_range(
            trace in arb_trace(),
            kind in arb_kind(),
            seed in any::<u64>(),
            rate in 0.0f64..=1.0,
        ) {
            let config = MutationConfig::new().with_injection_rate(rate);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutant = generate_mutant(&trace, kind, &config, &mut rng);
            prop_assert!(mutant.injection_points.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(mutant.injection_points.iter().all(|&i| i < trace.len()));
        }

        #[test]
        fn prop_positive_rate_injects(
            trace in arb_trace(),
            kind in arb_kind(),
            seed in any::<u64>(),
            rate in 0.001f64..=1.0,
        ) {
            prop_assume!(!trace.is_empty());
            let config = MutationConfig::new().with_injection_rate(rate);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutant = generate_mutant(&trace, kind, &config, &mut rng);
            prop_assert!(!mutant.injection_points.is_empty());
            prop_assert!(mutant.expected_bad_state);
        }

        #[test]
        fn prop_wrong_message_uses_pool(trace in arb_trace(), seed in any::<u64>()) {
            let config = MutationConfig::new().with_injection_rate(0.5);
            let pool = config.message_pool();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutant = wrong_message(&trace, &config, &mut rng);
            for &i in &mutant.injection_points {
                prop_assert!(pool.contains(&mutant.mutated_trace[i].event));
                let expected = Some(Provenance::WrongMessage {
                    original_event: trace[i].event.clone(),
                });
                prop_assert_eq!(&mutant.mutated_trace[i].provenance, &expected);
            }
        }

        #[test]
        fn prop_missing_message_keeps_length(
            trace in arb_trace(),
            seed in any::<u64>(),
            rate in 0.0f64..=1.0,
        ) {
            let config = MutationConfig::new().with_injection_rate(rate);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutant = missing_message(&trace, &config, &mut rng);
            prop_assert_eq!(mutant.mutated_trace.len(), trace.len());
            for &i in &mutant.injection_points {
                prop_assert_eq!(mutant.mutated_trace[i].event.as_str(), TIMEOUT_EVENT);
            }
        }
    }
}
