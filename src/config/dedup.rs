//! Header deduplication service configuration.

use serde::Serialize;

use super::parse::{parse_bool, parse_list, parse_or};
use super::ConfigError;
use crate::cache::DEFAULT_MAX_CACHE_SIZE;
use crate::core::{is_valid_header_name, PolicyTable};

/// Options recognized by the deduplication service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DedupConfig {
    /// Cache canonical names (HEADER_NAME_CACHE).
    pub enable_header_name_cache: bool,
    /// Name cache bound (HEADER_CACHE_SIZE).
    pub max_cache_size: usize,
    /// Warm the shared cache before batches (HEADER_BATCH_PROCESSING).
    pub enable_batch_processing: bool,
    /// Per-operation timing events (HEADER_PERF_LOG).
    pub enable_performance_logging: bool,
    /// Per-header trace events; development only (HEADER_DEBUG_LOG).
    pub debug_logging: bool,
    /// Report dropped values of critical headers (HEADER_LOG_CRITICAL).
    pub log_critical_conflicts: bool,
    /// Fail instead of resolving ambiguous conflicts (HEADER_STRICT).
    pub strict_mode: bool,
    /// Extra accumulate-policy names (HEADER_MULTI_VALUE).
    pub multi_value_headers: Vec<String>,
    /// Extra critical names (HEADER_CRITICAL).
    pub critical_headers: Vec<String>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enable_header_name_cache: true,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            enable_batch_processing: true,
            enable_performance_logging: false,
            debug_logging: false,
            log_critical_conflicts: true,
            strict_mode: false,
            multi_value_headers: Vec::new(),
            critical_headers: Vec::new(),
        }
    }
}

impl DedupConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| -> Result<bool, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(v) if v.trim().is_empty() => Ok(default),
                Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                    key: key.into(),
                    message: format!("expected a boolean, got '{}'", v),
                }),
            }
        };
        let names = |key: &str| -> Result<Vec<String>, ConfigError> {
            let list = lookup(key).map(|v| parse_list(&v)).unwrap_or_default();
            if let Some(bad) = list.iter().find(|n| !is_valid_header_name(n)) {
                return Err(ConfigError::Invalid {
                    key: key.into(),
                    message: format!("'{}' is not a header name", bad),
                });
            }
            Ok(list)
        };

        Ok(Self {
            enable_header_name_cache: flag(
                "HEADER_NAME_CACHE",
                defaults.enable_header_name_cache,
            )?,
            max_cache_size: parse_or(
                "HEADER_CACHE_SIZE",
                lookup("HEADER_CACHE_SIZE"),
                defaults.max_cache_size,
            )?,
            enable_batch_processing: flag(
                "HEADER_BATCH_PROCESSING",
                defaults.enable_batch_processing,
            )?,
            enable_performance_logging: flag(
                "HEADER_PERF_LOG",
                defaults.enable_performance_logging,
            )?,
            debug_logging: flag("HEADER_DEBUG_LOG", defaults.debug_logging)?,
            log_critical_conflicts: flag(
                "HEADER_LOG_CRITICAL",
                defaults.log_critical_conflicts,
            )?,
            strict_mode: flag("HEADER_STRICT", defaults.strict_mode)?,
            multi_value_headers: names("HEADER_MULTI_VALUE")?,
            critical_headers: names("HEADER_CRITICAL")?,
        })
    }

    /// Build the policy table for these options.
    pub fn policy_table(&self) -> PolicyTable {
        PolicyTable::new(
            self.multi_value_headers.iter().map(String::as_str),
            self.critical_headers.iter().map(String::as_str),
        )
    }

    /// Check if the name cache can hold anything.
    #[inline]
    pub fn is_cache_active(&self) -> bool {
        self.enable_header_name_cache && self.max_cache_size > 0
    }

    /// Enable or disable the name cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.enable_header_name_cache = enabled;
        self
    }

    /// Set the name cache bound.
    pub fn with_max_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Enable or disable batch warmup.
    pub fn with_batch_processing(mut self, enabled: bool) -> Self {
        self.enable_batch_processing = enabled;
        self
    }

    /// Enable or disable timing events.
    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Enable or disable per-header trace events.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Enable or disable critical conflict reporting.
    pub fn with_critical_conflict_logging(mut self, enabled: bool) -> Self {
        self.log_critical_conflicts = enabled;
        self
    }

    /// Enable or disable strict mode.
    pub fn with_strict_mode(mut self, enabled: bool) -> Self {
        self.strict_mode = enabled;
        self
    }

    /// Add an accumulate-policy header name.
    pub fn with_multi_value_header(mut self, name: impl Into<String>) -> Self {
        self.multi_value_headers.push(name.into());
        self
    }

    /// Add a critical header name.
    pub fn with_critical_header(mut self, name: impl Into<String>) -> Self {
        self.critical_headers.push(name.into());
        self
    }
}
