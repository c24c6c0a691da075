//! Header deduplication service.
//!
//! [`HeaderDeduplicationService`] turns raw transport headers into a
//! [`CanonicalHeaders`] map: names are canonicalized, repeated headers are
//! combined per the [`PolicyTable`], and conflicting single-value headers
//! are resolved last-wins (or rejected in strict mode).
//!
//! # Concurrency
//!
//! The service owns its name cache and is not internally synchronized.
//! Every mutating call takes `&mut self`: use one instance per worker, or
//! wrap a shared instance in a `Mutex`.
//!
//! # Example
//!
//! ```rust
//! use header_dedup::core::RawHeaders;
//! use header_dedup::HeaderDeduplicationService;
//!
//! let mut service = HeaderDeduplicationService::default();
//! let raw = RawHeaders::new()
//!     .with("content-type", "text/plain")
//!     .with("Content-Type", "text/html");
//!
//! let headers = service.deduplicate_headers(&raw).unwrap();
//! assert_eq!(headers.get_str("Content-Type"), Some("text/html"));
//! ```

mod batch;
mod merge;

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info, trace, warn, Dispatch};

use crate::cache::{CacheStats, NameCache};
use crate::config::DedupConfig;
use crate::core::{
    canonicalize, is_valid_header_name, CanonicalHeaders, HeaderError, HeaderValue, PolicyTable,
    RawHeaders, Result, ValuePolicy,
};
use crate::diagnostics::{
    ConfigSnapshot, OperationCounters, PerformanceMetrics, Suggestion, SuggestionEngine,
};
use crate::observability::HeaderMetrics;

/// Well-known headers preloaded by [`HeaderDeduplicationService::warmup_cache`].
pub const COMMON_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Charset",
    "Accept-Encoding",
    "Accept-Language",
    "Accept-Ranges",
    "Access-Control-Allow-Origin",
    "Age",
    "Allow",
    "Authorization",
    "Cache-Control",
    "Connection",
    "Content-Disposition",
    "Content-Encoding",
    "Content-Language",
    "Content-Length",
    "Content-Type",
    "Cookie",
    "Date",
    "Etag",
    "Expires",
    "Host",
    "If-Modified-Since",
    "If-None-Match",
    "Last-Modified",
    "Location",
    "Origin",
    "Pragma",
    "Referer",
    "Server",
    "Set-Cookie",
    "Transfer-Encoding",
    "User-Agent",
    "Vary",
    "X-Forwarded-For",
    "X-Forwarded-Proto",
    "X-Powered-By",
    "X-Requested-With",
];

/// The contract runtime adapters program against.
pub trait HeaderDeduplication {
    /// Canonicalize a single header name.
    fn normalize_header_name(&mut self, raw: &str) -> Result<String>;

    /// Collapse raw headers into one entry per logical header.
    fn deduplicate_headers(&mut self, headers: &RawHeaders) -> Result<CanonicalHeaders>;

    /// Combine two header sets; `primary` wins single-value conflicts.
    fn merge_headers(
        &mut self,
        primary: &RawHeaders,
        secondary: &RawHeaders,
    ) -> Result<CanonicalHeaders>;

    /// Deduplicate many header sets; one failure never aborts the rest.
    fn batch_deduplicate_headers(&mut self, batch: &[RawHeaders]) -> Vec<Result<CanonicalHeaders>>;
}

/// Header normalization, deduplication and merging with a bounded name cache.
pub struct HeaderDeduplicationService {
    config: DedupConfig,
    policies: PolicyTable,
    cache: NameCache,
    counters: OperationCounters,
    /// Injected logger; `None` logs to the global default subscriber
    dispatch: Option<Dispatch>,
    metrics: Option<Arc<HeaderMetrics>>,
}

impl HeaderDeduplicationService {
    /// Create a service from configuration.
    pub fn new(config: DedupConfig) -> Self {
        let policies = config.policy_table();
        let cache = NameCache::with_capacity(config.max_cache_size);
        Self {
            config,
            policies,
            cache,
            counters: OperationCounters::default(),
            dispatch: None,
            metrics: None,
        }
    }

    /// Route this service's log events to `dispatch` instead of the global subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Mirror counters and timings into a Prometheus registry.
    pub fn with_metrics(mut self, metrics: Arc<HeaderMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[inline]
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    #[inline]
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Read-only view of the name cache.
    #[inline]
    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    #[inline]
    pub fn counters(&self) -> OperationCounters {
        self.counters
    }

    /// Canonicalize a header name, consulting the name cache first.
    ///
    /// Every call counts as exactly one cache hit or miss. A name that is
    /// empty after trimming is never cached and yields
    /// [`HeaderError::InvalidHeaderName`].
    pub fn normalize_header_name(&mut self, raw: &str) -> Result<String> {
        let cache_active = self.config.is_cache_active();

        if cache_active {
            if let Some(canonical) = self.cache.lookup(raw) {
                return Ok(canonical.to_string());
            }
        } else {
            self.cache.record_miss();
        }

        let canonical = canonicalize(raw).ok_or_else(|| HeaderError::InvalidHeaderName {
            name: raw.to_string(),
        })?;

        if cache_active {
            self.cache.insert(raw, &canonical);
        }
        Ok(canonical)
    }

    /// Collapse raw headers into one entry per logical header.
    ///
    /// A header given once keeps its value unchanged, lists included.
    /// Repeated accumulate-policy headers keep every value in input order;
    /// other repeated headers keep the last entry's whole value. In strict mode, invalid names and
    /// distinct conflicting values are errors; otherwise invalid names are
    /// skipped and conflicts resolve silently (critical ones are logged).
    pub fn deduplicate_headers(&mut self, headers: &RawHeaders) -> Result<CanonicalHeaders> {
        let start = self.timer();
        let result = self.dedup_inner(headers);
        self.counters.operations += 1;

        if let Some(start) = start {
            let elapsed = start.elapsed();
            if self.config.enable_performance_logging {
                let output = result.as_ref().map(CanonicalHeaders::len).unwrap_or(0);
                self.emit(|| {
                    debug!(
                        target: "header_dedup::perf",
                        operation = "deduplicate",
                        duration_us = elapsed.as_micros() as u64,
                        input_entries = headers.len(),
                        output_headers = output,
                        "headers deduplicated"
                    )
                });
            }
            self.observe("deduplicate", elapsed.as_secs_f64(), result.as_ref().err());
        }

        result
    }

    /// Pre-populate the cache with well-known header names.
    ///
    /// Each name is stored under its lower-case and canonical spelling.
    /// Never evicts and never touches hit/miss counters, so repeated calls
    /// are harmless. Returns the number of entries added.
    pub fn warmup_cache(&mut self) -> usize {
        if !self.config.is_cache_active() {
            return 0;
        }

        let mut inserted = 0;
        for name in COMMON_HEADERS {
            let Some(canonical) = canonicalize(name) else {
                continue;
            };
            let lower = name.to_ascii_lowercase();
            for key in [lower.as_str(), canonical.as_str()] {
                if self.cache.insert_if_room(key, &canonical) {
                    inserted += 1;
                }
            }
        }

        let size = self.cache.len();
        self.emit(|| debug!(inserted, cache_size = size, "header name cache warmed"));
        self.sync_cache_metrics();
        inserted
    }

    /// Current name cache statistics.
    #[inline]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Empty the name cache and reset its counters.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.sync_cache_metrics();
    }

    /// Snapshot of cache stats, active flags and operation counters.
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            cache_stats: self.cache.stats(),
            config: ConfigSnapshot::from(&self.config),
            counters: self.counters,
        }
    }

    /// Advisory suggestions derived from the current metrics.
    pub fn optimization_suggestions(&self) -> Vec<Suggestion> {
        SuggestionEngine::generate(&self.performance_metrics())
    }

    /// Log cache statistics, counters and suggestions at info level.
    pub fn log_summary(&self) {
        let metrics = self.performance_metrics();
        let suggestions = self.optimization_suggestions();
        self.emit(|| {
            let stats = &metrics.cache_stats;
            info!("Header service summary:");
            info!(
                "  Cache: {}/{} names, {} hits, {} misses, {} evictions ({:.1}% hit rate)",
                stats.cache_size,
                stats.max_cache_size,
                stats.hits,
                stats.misses,
                stats.evictions,
                stats.hit_rate_percent
            );
            info!(
                "  Operations: {} deduplicate, {} merge, {} batch",
                metrics.counters.operations, metrics.counters.merges, metrics.counters.batches
            );
            info!(
                "  Conflicts: {} resolved, {} critical",
                metrics.counters.conflicts_resolved, metrics.counters.critical_conflicts
            );
            for suggestion in &suggestions {
                info!("  Suggestion ({:?}): {}", suggestion.suggestion_type, suggestion.message);
            }
        });
    }

    fn dedup_inner(&mut self, headers: &RawHeaders) -> Result<CanonicalHeaders> {
        let groups = self.group(headers)?;

        let mut out = CanonicalHeaders::new();
        for (name, values) in groups {
            let value = self.resolve_group(&name, values)?;
            out.insert_canonical(name, value);
        }
        Ok(out)
    }

    /// Group raw entries by canonical name, in first-seen order.
    ///
    /// A list value stays one entry; it is never split into members.
    fn group<'a>(
        &mut self,
        headers: &'a RawHeaders,
    ) -> Result<IndexMap<String, Vec<&'a HeaderValue>>> {
        let mut groups: IndexMap<String, Vec<&'a HeaderValue>> =
            IndexMap::with_capacity(headers.len());

        for (raw, value) in headers.iter() {
            if value.is_empty() {
                continue;
            }

            let canonical = match self.checked_name(raw) {
                Ok(canonical) => canonical,
                Err(err) if !self.config.strict_mode => {
                    self.counters.invalid_names_skipped += 1;
                    self.emit(|| debug!(name = raw, error = %err, "skipping invalid header name"));
                    continue;
                }
                Err(err) => return Err(err),
            };

            groups.entry(canonical).or_default().push(value);
        }

        Ok(groups)
    }

    /// Strict mode also requires the trimmed name to be a valid token.
    fn checked_name(&mut self, raw: &str) -> Result<String> {
        if self.config.strict_mode && !is_valid_header_name(raw.trim()) {
            return Err(HeaderError::InvalidHeaderName {
                name: raw.to_string(),
            });
        }
        self.normalize_header_name(raw)
    }

    fn resolve_group(&mut self, name: &str, entries: Vec<&HeaderValue>) -> Result<HeaderValue> {
        let policy = self.policies.policy(name);

        if self.config.debug_logging {
            let members = entries.len();
            self.emit(|| {
                trace!(
                    target: "header_dedup::trace",
                    header = name,
                    members,
                    policy = policy.as_str(),
                    "resolving header group"
                )
            });
        }

        let Some((&kept, earlier)) = entries.split_last() else {
            return Ok(HeaderValue::Multi(Vec::new()));
        };

        if earlier.is_empty() {
            return Ok(kept.clone());
        }

        if policy == ValuePolicy::Accumulate {
            return Ok(HeaderValue::from_values(
                entries
                    .iter()
                    .flat_map(|v| v.iter())
                    .map(String::from)
                    .collect(),
            ));
        }

        // Override: the last entry wins whole; only distinct earlier entries count as dropped
        let dropped = distinct(earlier.iter().copied().filter(|v| *v != kept));

        if dropped.is_empty() {
            return Ok(kept.clone());
        }

        let critical = self.policies.is_critical(name);

        if self.config.strict_mode {
            if let Some(ref metrics) = self.metrics {
                metrics.record_conflict(name, critical, "rejected");
            }
            let mut values: Vec<String> = dropped.iter().map(|v| v.to_string()).collect();
            values.push(kept.to_string());
            return Err(HeaderError::ConflictResolutionAmbiguity {
                name: name.to_string(),
                values,
            });
        }

        self.counters.conflicts_resolved += 1;
        if let Some(ref metrics) = self.metrics {
            metrics.record_conflict(name, critical, "last_wins");
        }

        if critical {
            self.counters.critical_conflicts += 1;
            if self.config.log_critical_conflicts {
                let dropped: Vec<String> = dropped.iter().map(|v| v.to_string()).collect();
                self.emit(|| {
                    warn!(
                        target: "header_dedup::conflict",
                        header = name,
                        kept = %kept,
                        dropped = ?dropped,
                        "critical header conflict resolved, last value wins"
                    )
                });
            }
        }

        Ok(kept.clone())
    }

    /// Run `f` with this service's logger installed.
    fn emit<F: FnOnce()>(&self, f: F) {
        match self.dispatch {
            Some(ref dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    /// Start a timer only when something consumes the duration.
    #[inline]
    fn timer(&self) -> Option<Instant> {
        (self.config.enable_performance_logging || self.metrics.is_some()).then(Instant::now)
    }

    fn observe(&self, operation: &str, duration_secs: f64, error: Option<&HeaderError>) {
        if let Some(ref metrics) = self.metrics {
            metrics.record_operation(operation, duration_secs);
            if let Some(err) = error {
                metrics.record_error(err.kind());
            }
            metrics.update_cache(&self.cache.stats());
        }
    }

    fn sync_cache_metrics(&self) {
        if let Some(ref metrics) = self.metrics {
            metrics.update_cache(&self.cache.stats());
        }
    }
}

impl Default for HeaderDeduplicationService {
    fn default() -> Self {
        Self::new(DedupConfig::default())
    }
}

impl HeaderDeduplication for HeaderDeduplicationService {
    fn normalize_header_name(&mut self, raw: &str) -> Result<String> {
        HeaderDeduplicationService::normalize_header_name(self, raw)
    }

    fn deduplicate_headers(&mut self, headers: &RawHeaders) -> Result<CanonicalHeaders> {
        HeaderDeduplicationService::deduplicate_headers(self, headers)
    }

    fn merge_headers(
        &mut self,
        primary: &RawHeaders,
        secondary: &RawHeaders,
    ) -> Result<CanonicalHeaders> {
        HeaderDeduplicationService::merge_headers(self, primary, secondary)
    }

    fn batch_deduplicate_headers(&mut self, batch: &[RawHeaders]) -> Vec<Result<CanonicalHeaders>> {
        HeaderDeduplicationService::batch_deduplicate_headers(self, batch)
    }
}

/// Distinct values in first-seen order.
fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
