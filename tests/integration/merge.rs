//! Merging a primary header set with fallback headers.

use crate::helpers::*;
use header_dedup::config::DedupConfig;
use header_dedup::{HeaderDeduplicationService, HeaderValue, RawHeaders};

/// Response headers override defaults, defaults fill the gaps
#[test]
fn test_response_over_defaults() {
    let mut service = HeaderDeduplicationService::default();
    let response = raw(&[("content-type", "application/json"), ("x-request-id", "42")]);
    let defaults = raw(&[
        ("Content-Type", "text/html"),
        ("X-Powered-By", "header_dedup"),
        ("cache-control", "no-cache"),
    ]);

    let out = service.merge_headers(&response, &defaults).unwrap();

    assert_unique_names(&out);
    assert_eq!(
        out.names().collect::<Vec<_>>(),
        vec!["Content-Type", "X-Request-Id", "X-Powered-By", "Cache-Control"]
    );
    assert_eq!(out.get_str("Content-Type"), Some("application/json"));
    assert_eq!(out.get_str("Cache-Control"), Some("no-cache"));
}

#[test]
fn test_merge_both_empty() {
    let mut service = HeaderDeduplicationService::default();
    let out = service
        .merge_headers(&RawHeaders::new(), &RawHeaders::new())
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_empty_primary_takes_secondary() {
    let mut service = HeaderDeduplicationService::default();
    let secondary = raw(&[("vary", "Accept"), ("Vary", "Origin")]);

    let merged = service.merge_headers(&RawHeaders::new(), &secondary).unwrap();
    let deduped = service.deduplicate_headers(&secondary).unwrap();
    assert_eq!(merged, deduped);
}

/// Accumulated headers combine both sides without exact repeats
#[test]
fn test_set_cookie_union() {
    let mut service = HeaderDeduplicationService::default();
    let primary = raw(&[("Set-Cookie", "session=abc")]);
    let secondary = raw(&[("set-cookie", "session=abc"), ("set-cookie", "lang=en")]);

    let out = service.merge_headers(&primary, &secondary).unwrap();
    assert_eq!(
        out.get("Set-Cookie"),
        Some(&HeaderValue::from(vec!["session=abc", "lang=en"]))
    );
}

/// Overriding a critical header from the fallback set is reported
#[test]
fn test_critical_override_logged() {
    let (mut service, capture) = captured_service(DedupConfig::default());
    let primary = raw(&[("Location", "/new")]);
    let secondary = raw(&[("location", "/old")]);

    let out = service.merge_headers(&primary, &secondary).unwrap();
    assert_eq!(out.get_str("Location"), Some("/new"));

    let warnings = capture.with_target("header_dedup::conflict");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("kept"), Some("/new"));
    assert!(warnings[0].mentions("/old"));
}

/// Equal values on both sides are not a conflict
#[test]
fn test_same_value_not_reported() {
    let (mut service, capture) = captured_service(DedupConfig::default());
    service
        .merge_headers(&raw(&[("Host", "example.com")]), &raw(&[("host", "example.com")]))
        .unwrap();

    assert!(capture.events().is_empty());
    assert_eq!(service.counters().conflicts_resolved, 0);
}

#[test]
fn test_merge_perf_event() {
    let config = DedupConfig::default().with_performance_logging(true);
    let (mut service, capture) = captured_service(config);
    service
        .merge_headers(&raw(&[("a", "1")]), &raw(&[("b", "2")]))
        .unwrap();

    let perf = capture.with_target("header_dedup::perf");
    assert_eq!(perf.len(), 1);
    assert_eq!(perf[0].field("operation"), Some("merge"));
}

/// Fallback-only list values pass through unchanged
#[test]
fn test_secondary_list_unchanged() {
    let mut service = HeaderDeduplicationService::default();
    let secondary = RawHeaders::new().with("Vary", vec!["Accept", "Origin"]);

    let out = service.merge_headers(&RawHeaders::new(), &secondary).unwrap();
    assert_eq!(out.get("Vary"), Some(&HeaderValue::from(vec!["Accept", "Origin"])));
}
