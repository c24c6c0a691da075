//! Read-only diagnostics for the header service.
//!
//! [`PerformanceMetrics`] is a snapshot assembled on request; nothing here
//! is stored between calls. [`SuggestionEngine`] turns a snapshot into
//! advisory [`Suggestion`]s.

mod recommender;

pub use recommender::{Priority, Suggestion, SuggestionEngine, SuggestionType};

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::DedupConfig;

/// Running counters kept by a service instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounters {
    /// `deduplicate_headers` calls (including batch items).
    pub operations: u64,
    /// `merge_headers` calls.
    pub merges: u64,
    /// `batch_deduplicate_headers` calls.
    pub batches: u64,
    /// Override groups where distinct values were dropped.
    pub conflicts_resolved: u64,
    /// Resolved conflicts on critical headers.
    pub critical_conflicts: u64,
    /// Entries skipped for an invalid name (lenient mode).
    pub invalid_names_skipped: u64,
    /// Batch items that returned an error.
    pub batch_items_failed: u64,
}

/// Active configuration flags, as reported in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSnapshot {
    pub cache_enabled: bool,
    pub batch_enabled: bool,
    pub performance_logging: bool,
    pub debug_logging: bool,
    pub log_critical_conflicts: bool,
    pub strict_mode: bool,
    pub max_cache_size: usize,
}

impl From<&DedupConfig> for ConfigSnapshot {
    fn from(config: &DedupConfig) -> Self {
        Self {
            cache_enabled: config.enable_header_name_cache,
            batch_enabled: config.enable_batch_processing,
            performance_logging: config.enable_performance_logging,
            debug_logging: config.debug_logging,
            log_critical_conflicts: config.log_critical_conflicts,
            strict_mode: config.strict_mode,
            max_cache_size: config.max_cache_size,
        }
    }
}

/// Snapshot combining cache stats, configuration and counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub cache_stats: CacheStats,
    pub config: ConfigSnapshot,
    pub counters: OperationCounters,
}
