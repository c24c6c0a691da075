use serde::Serialize;

use super::PerformanceMetrics;

/// Minimum lookups before hit-rate based advice is given.
const MIN_LOOKUPS: u64 = 100;

/// Hit rate (percent) below which the cache is considered ineffective.
const LOW_HIT_RATE_PERCENT: f64 = 80.0;

/// Fill level (percent) at which the cache is considered near its limit.
const NEAR_CAPACITY_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Cache,
    Config,
    Logging,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Inspect a metrics snapshot and return advice, highest priority first.
    pub fn generate(metrics: &PerformanceMetrics) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        suggestions.extend(Self::cache_suggestions(metrics));

        if metrics.config.debug_logging {
            suggestions.push(Suggestion {
                suggestion_type: SuggestionType::Logging,
                priority: Priority::Medium,
                message: "Debug logging traces every header; disable it in production".to_string(),
            });
        }

        if !metrics.config.batch_enabled {
            suggestions.push(Suggestion {
                suggestion_type: SuggestionType::Batch,
                priority: Priority::Low,
                message: "Enable batch processing so batches share a warmed name cache"
                    .to_string(),
            });
        }

        // Stable sort keeps rule order within a priority
        suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));
        suggestions
    }

    fn cache_suggestions(metrics: &PerformanceMetrics) -> Vec<Suggestion> {
        let stats = &metrics.cache_stats;
        let config = &metrics.config;

        if !config.cache_enabled || config.max_cache_size == 0 {
            return vec![Suggestion {
                suggestion_type: SuggestionType::Config,
                priority: Priority::High,
                message: "Header name cache is disabled; enable it to avoid recomputing names"
                    .to_string(),
            }];
        }

        let mut suggestions = Vec::new();
        let lookups = stats.lookups();

        if lookups >= MIN_LOOKUPS && stats.hit_rate_percent < LOW_HIT_RATE_PERCENT {
            suggestions.push(Suggestion {
                suggestion_type: SuggestionType::Cache,
                priority: Priority::Medium,
                message: format!(
                    "Cache hit rate is {:.1}% over {} lookups; call warmup_cache() at startup or raise max_cache_size",
                    stats.hit_rate_percent, lookups
                ),
            });
        }

        if stats.fill_percent() >= NEAR_CAPACITY_PERCENT {
            suggestions.push(Suggestion {
                suggestion_type: SuggestionType::Cache,
                priority: Priority::Medium,
                message: format!(
                    "Cache holds {} of {} names; consider raising max_cache_size",
                    stats.cache_size, stats.max_cache_size
                ),
            });
        }

        if lookups >= MIN_LOOKUPS && stats.evictions > stats.misses / 2 {
            suggestions.push(Suggestion {
                suggestion_type: SuggestionType::Cache,
                priority: Priority::High,
                message: format!(
                    "{} evictions for {} misses; the cache is thrashing, raise max_cache_size",
                    stats.evictions, stats.misses
                ),
            });
        }

        suggestions
    }
}
