//! Name cache bounds, eviction order and statistics.

use header_dedup::config::DedupConfig;
use header_dedup::HeaderDeduplicationService;

/// A full cache evicts the oldest name first
#[test]
fn test_fifo_eviction() {
    let mut service =
        HeaderDeduplicationService::new(DedupConfig::default().with_max_cache_size(3));

    for name in ["x-one", "x-two", "x-three", "x-four"] {
        service.normalize_header_name(name).unwrap();
    }

    let stats = service.cache_stats();
    assert_eq!(stats.cache_size, 3);
    assert_eq!(stats.max_cache_size, 3);
    assert_eq!(stats.evictions, 1);
    assert!(!service.cache().contains("x-one"));
    assert!(service.cache().contains("x-four"));
}

/// Every normalization is exactly one hit or one miss
#[test]
fn test_stats_consistency() {
    let mut service = HeaderDeduplicationService::default();
    let names = ["accept", "Accept", "accept", "x-id", "x-id", "x-id", "", "Host"];

    for name in names {
        let _ = service.normalize_header_name(name);
    }

    let stats = service.cache_stats();
    assert_eq!(stats.hits + stats.misses, names.len() as u64);
    assert_eq!(stats.hits, 3);
    assert!(stats.cache_size <= stats.max_cache_size);
    let expected = stats.hits as f64 / (stats.hits + stats.misses) as f64 * 100.0;
    assert!((stats.hit_rate_percent - expected).abs() < 1e-9);
}

#[test]
fn test_no_lookups_zero_hit_rate() {
    let service = HeaderDeduplicationService::default();
    let stats = service.cache_stats();
    assert_eq!(stats.hit_rate_percent, 0.0);
    assert_eq!(stats.cache_size, 0);
}

/// Zero capacity behaves like a disabled cache
#[test]
fn test_zero_capacity() {
    let mut service =
        HeaderDeduplicationService::new(DedupConfig::default().with_max_cache_size(0));

    assert_eq!(service.normalize_header_name("accept").unwrap(), "Accept");
    assert_eq!(service.normalize_header_name("accept").unwrap(), "Accept");
    assert_eq!(service.warmup_cache(), 0);

    let stats = service.cache_stats();
    assert_eq!(stats.cache_size, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 2);
}

/// Deduplication counts every entry's name lookup
#[test]
fn test_dedup_drives_cache() {
    let mut service = HeaderDeduplicationService::default();
    let raw = header_dedup::RawHeaders::new()
        .with("accept", "a")
        .with("accept", "b")
        .with("accept", "c");

    service.deduplicate_headers(&raw).unwrap();
    let stats = service.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

/// Clearing resets cache stats but keeps operation counters
#[test]
fn test_clear_keeps_counters() {
    let mut service = HeaderDeduplicationService::default();
    service
        .deduplicate_headers(&header_dedup::RawHeaders::new().with("a", "1"))
        .unwrap();
    service.clear_cache();

    assert_eq!(service.cache_stats().misses, 0);
    assert_eq!(service.counters().operations, 1);
}

#[test]
fn test_warmup_then_lookup_hits() {
    let mut service = HeaderDeduplicationService::default();
    let added = service.warmup_cache();
    assert!(added > 0);

    for name in ["content-type", "Content-Type", "set-cookie", "user-agent"] {
        service.normalize_header_name(name).unwrap();
    }
    assert_eq!(service.cache_stats().hits, 4);
    assert_eq!(service.cache_stats().misses, 0);
}
