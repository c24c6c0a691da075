//! Prometheus export and diagnostics snapshots.

use std::sync::Arc;

use header_dedup::config::DedupConfig;
use header_dedup::diagnostics::{Priority, SuggestionType};
use header_dedup::observability::HeaderMetrics;
use header_dedup::{HeaderDeduplicationService, RawHeaders};

#[test]
fn test_metrics_follow_operations() {
    let metrics = Arc::new(HeaderMetrics::new().unwrap());
    let mut service = HeaderDeduplicationService::default().with_metrics(Arc::clone(&metrics));

    service
        .deduplicate_headers(
            &RawHeaders::new()
                .with("Content-Type", "a")
                .with("content-type", "b")
                .with("X-One", "1")
                .with("x-one", "2"),
        )
        .unwrap();
    service
        .merge_headers(&RawHeaders::new(), &RawHeaders::new())
        .unwrap();

    assert_eq!(
        metrics
            .operations_total
            .with_label_values(&["deduplicate"])
            .get(),
        1.0
    );
    assert_eq!(metrics.operations_total.with_label_values(&["merge"]).get(), 1.0);
    assert_eq!(
        metrics
            .conflicts_total
            .with_label_values(&["Content-Type", "last_wins"])
            .get(),
        1.0
    );
    assert_eq!(
        metrics
            .conflicts_total
            .with_label_values(&["other", "last_wins"])
            .get(),
        1.0
    );
    assert_eq!(metrics.cache_entries.get(), 4.0);

    let text = metrics.export();
    assert!(text.contains("header_dedup_operations_total"));
    assert!(text.contains("header_dedup_operation_duration_seconds"));
}

#[test]
fn test_strict_errors_counted() {
    let metrics = Arc::new(HeaderMetrics::new().unwrap());
    let mut service =
        HeaderDeduplicationService::new(DedupConfig::default().with_strict_mode(true))
            .with_metrics(Arc::clone(&metrics));

    let _ = service.deduplicate_headers(&RawHeaders::new().with("Host", "a").with("host", "b"));

    assert_eq!(
        metrics
            .errors_total
            .with_label_values(&["ambiguous_conflict"])
            .get(),
        1.0
    );
    assert_eq!(
        metrics
            .conflicts_total
            .with_label_values(&["Host", "rejected"])
            .get(),
        1.0
    );
}

#[test]
fn test_performance_metrics_snapshot() {
    let mut service = HeaderDeduplicationService::default();
    service
        .deduplicate_headers(&RawHeaders::new().with("accept", "*/*"))
        .unwrap();
    service.batch_deduplicate_headers(&[RawHeaders::new().with("a", "1")]);

    let snapshot = service.performance_metrics();
    assert!(snapshot.config.cache_enabled);
    assert_eq!(snapshot.counters.operations, 2);
    assert_eq!(snapshot.counters.batches, 1);
    assert_eq!(snapshot.cache_stats, service.cache_stats());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["counters"]["operations"], 2);
    assert_eq!(json["config"]["strict_mode"], false);
}

#[test]
fn test_suggestions_for_disabled_cache() {
    let config = DedupConfig::default()
        .with_cache(false)
        .with_debug_logging(true);
    let service = HeaderDeduplicationService::new(config);

    let suggestions = service.optimization_suggestions();
    assert_eq!(suggestions[0].suggestion_type, SuggestionType::Config);
    assert_eq!(suggestions[0].priority, Priority::High);
    assert!(suggestions
        .iter()
        .any(|s| s.suggestion_type == SuggestionType::Logging));
}

#[test]
fn test_default_service_has_no_suggestions() {
    let service = HeaderDeduplicationService::default();
    assert!(service.optimization_suggestions().is_empty());
}
