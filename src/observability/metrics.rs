//! Prometheus metrics for header_dedup.
//!
//! Mirrors the service's operation counters, conflict outcomes and name
//! cache state so hosts can scrape them next to their own metrics.

use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

use crate::cache::CacheStats;

/// Label used for conflicts on headers outside the critical set.
const OTHER_HEADER: &str = "other";

/// Prometheus registry with all header processing metrics.
pub struct HeaderMetrics {
    registry: Registry,

    // === Operation Metrics ===
    /// Operations by kind (deduplicate, merge, batch)
    pub operations_total: CounterVec,

    /// Operation duration in seconds
    pub operation_duration_seconds: HistogramVec,

    /// Errors by kind
    pub errors_total: CounterVec,

    // === Conflict Metrics ===
    /// Conflicts by header and resolution (last_wins, primary_wins, rejected)
    pub conflicts_total: CounterVec,

    // === Name Cache Metrics ===
    /// Cached names
    pub cache_entries: Gauge,

    /// Cache capacity
    pub cache_capacity: Gauge,

    /// Cache hits since last clear
    pub cache_hits: Gauge,

    /// Cache misses since last clear
    pub cache_misses: Gauge,

    /// Cache evictions since last clear
    pub cache_evictions: Gauge,

    /// Cache hit rate (0 - 100)
    pub cache_hit_rate_percent: Gauge,
}

impl HeaderMetrics {
    /// Create a new metrics registry with all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Header processing is microsecond-scale
        let op_buckets = vec![
            0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01,
        ];

        let operations_total = CounterVec::new(
            Opts::new("header_dedup_operations_total", "Total header operations"),
            &["operation"],
        )?;
        registry.register(Box::new(operations_total.clone()))?;

        let operation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "header_dedup_operation_duration_seconds",
                "Header operation duration in seconds",
            )
            .buckets(op_buckets),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration_seconds.clone()))?;

        let errors_total = CounterVec::new(
            Opts::new("header_dedup_errors_total", "Header processing errors"),
            &["kind"],
        )?;
        registry.register(Box::new(errors_total.clone()))?;

        let conflicts_total = CounterVec::new(
            Opts::new("header_dedup_conflicts_total", "Resolved header conflicts"),
            &["header", "resolution"],
        )?;
        registry.register(Box::new(conflicts_total.clone()))?;

        let cache_entries = Gauge::new("header_dedup_cache_entries", "Cached header names")?;
        registry.register(Box::new(cache_entries.clone()))?;

        let cache_capacity = Gauge::new("header_dedup_cache_capacity", "Name cache capacity")?;
        registry.register(Box::new(cache_capacity.clone()))?;

        let cache_hits = Gauge::new("header_dedup_cache_hits", "Name cache hits")?;
        registry.register(Box::new(cache_hits.clone()))?;

        let cache_misses = Gauge::new("header_dedup_cache_misses", "Name cache misses")?;
        registry.register(Box::new(cache_misses.clone()))?;

        let cache_evictions = Gauge::new("header_dedup_cache_evictions", "Name cache evictions")?;
        registry.register(Box::new(cache_evictions.clone()))?;

        let cache_hit_rate_percent = Gauge::new(
            "header_dedup_cache_hit_rate_percent",
            "Name cache hit rate in percent",
        )?;
        registry.register(Box::new(cache_hit_rate_percent.clone()))?;

        Ok(Self {
            registry,
            operations_total,
            operation_duration_seconds,
            errors_total,
            conflicts_total,
            cache_entries,
            cache_capacity,
            cache_hits,
            cache_misses,
            cache_evictions,
            cache_hit_rate_percent,
        })
    }

    /// Record one completed operation.
    pub fn record_operation(&self, operation: &str, duration_secs: f64) {
        self.operations_total.with_label_values(&[operation]).inc();
        self.operation_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Record a resolved conflict. Only critical headers get their own label.
    pub fn record_conflict(&self, header: &str, critical: bool, resolution: &str) {
        let label = if critical { header } else { OTHER_HEADER };
        self.conflicts_total
            .with_label_values(&[label, resolution])
            .inc();
    }

    /// Record an error by kind.
    pub fn record_error(&self, kind: &str) {
        self.errors_total.with_label_values(&[kind]).inc();
    }

    /// Update name cache gauges.
    pub fn update_cache(&self, stats: &CacheStats) {
        self.cache_entries.set(stats.cache_size as f64);
        self.cache_capacity.set(stats.max_cache_size as f64);
        self.cache_hits.set(stats.hits as f64);
        self.cache_misses.set(stats.misses as f64);
        self.cache_evictions.set(stats.evictions as f64);
        self.cache_hit_rate_percent.set(stats.hit_rate_percent);
    }

    /// Export metrics in Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Get the Prometheus registry (for custom metrics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
