//! Batch deduplication over a shared cache.

use crate::helpers::*;
use header_dedup::config::DedupConfig;
use header_dedup::{HeaderDeduplication, HeaderDeduplicationService, HeaderError, RawHeaders};

fn requests() -> Vec<RawHeaders> {
    vec![
        raw(&[("host", "a.example"), ("accept", "*/*")]),
        raw(&[("Host", "b.example"), ("X-Mode", "1"), ("x-mode", "2")]),
        raw(&[("user-agent", "curl"), ("set-cookie", "a=1"), ("Set-Cookie", "b=2")]),
    ]
}

/// Results line up with inputs
#[test]
fn test_batch_matches_individual_calls() {
    let mut batched = HeaderDeduplicationService::default();
    let mut single = HeaderDeduplicationService::default();
    let inputs = requests();

    let results = batched.batch_deduplicate_headers(&inputs);
    assert_eq!(results.len(), inputs.len());

    for (input, result) in inputs.iter().zip(&results) {
        let expected = single.deduplicate_headers(input).unwrap();
        assert_eq!(result.as_ref().unwrap(), &expected);
    }
}

/// A failing item is reported at its index; others still succeed
#[test]
fn test_partial_failure() {
    let mut service =
        HeaderDeduplicationService::new(DedupConfig::default().with_strict_mode(true));
    let results = service.batch_deduplicate_headers(&requests());

    assert!(results[0].is_ok());
    assert!(results[2].is_ok());
    match &results[1] {
        Err(HeaderError::BatchItemFailure { index, source }) => {
            assert_eq!(*index, 1);
            assert!(matches!(
                **source,
                HeaderError::ConflictResolutionAmbiguity { .. }
            ));
        }
        other => panic!("expected batch item failure, got {:?}", other),
    }

    let counters = service.counters();
    assert_eq!(counters.batches, 1);
    assert_eq!(counters.batch_items_failed, 1);
}

/// Failures are logged and do not stop the batch
#[test]
fn test_failure_logged() {
    let config = DedupConfig::default().with_strict_mode(true);
    let (mut service, capture) = captured_service(config);
    service.batch_deduplicate_headers(&requests());

    let failed: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.message.contains("batch item failed"))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].field("index"), Some("1"));
}

/// Batch processing warms the cache so common names hit
#[test]
fn test_warm_cache_hits() {
    let mut service = HeaderDeduplicationService::default();
    service.batch_deduplicate_headers(&requests());

    let stats = service.cache_stats();
    // host, accept, Host, user-agent, set-cookie, Set-Cookie are warmed
    assert_eq!(stats.hits, 6);
    assert_eq!(stats.misses, 2);
}

#[test]
fn test_batch_perf_event() {
    let config = DedupConfig::default().with_performance_logging(true);
    let (mut service, capture) = captured_service(config);
    service.batch_deduplicate_headers(&requests());

    let batch_events: Vec<_> = capture
        .with_target("header_dedup::perf")
        .into_iter()
        .filter(|e| e.field("operation") == Some("batch"))
        .collect();
    assert_eq!(batch_events.len(), 1);
    assert_eq!(batch_events[0].field("items"), Some("3"));
}

/// Timing is reported even when the shared cache warmup is off
#[test]
fn test_batch_perf_event_without_batch_processing() {
    let config = DedupConfig::default()
        .with_batch_processing(false)
        .with_performance_logging(true);
    let (mut service, capture) = captured_service(config);
    service.batch_deduplicate_headers(&requests());

    let batch_events: Vec<_> = capture
        .with_target("header_dedup::perf")
        .into_iter()
        .filter(|e| e.field("operation") == Some("batch"))
        .collect();
    assert_eq!(batch_events.len(), 1);
}

/// Adapters can hold the service behind the trait
#[test]
fn test_through_trait_object() {
    let mut service = HeaderDeduplicationService::default();
    let adapter: &mut dyn HeaderDeduplication = &mut service;

    let results = adapter.batch_deduplicate_headers(&requests());
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(adapter.normalize_header_name("x-forwarded-for").unwrap(), "X-Forwarded-For");
}
