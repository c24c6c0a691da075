//! Configuration module for header_dedup.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use header_dedup::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Cache size: {}", config.dedup.max_cache_size);
//! ```

mod dedup;
mod error;
mod logging;
mod parse;

pub use dedup::DedupConfig;
pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use parse::{parse_bool, parse_list};

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Deduplication service configuration.
    pub dedup: DedupConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dedup: DedupConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        let dedup = &self.dedup;
        info!("Configuration loaded:");
        info!("  Log filter: {}", self.logging.filter);

        if dedup.enable_header_name_cache {
            info!("  Name cache: enabled ({} entries max)", dedup.max_cache_size);
        } else {
            info!("  Name cache: disabled");
        }

        if dedup.enable_batch_processing {
            info!("  Batch processing: enabled");
        }

        if dedup.strict_mode {
            info!("  Strict mode: enabled");
        }

        if dedup.log_critical_conflicts {
            info!("  Critical conflict logging: enabled");
        }

        if dedup.enable_performance_logging {
            info!("  Performance logging: enabled");
        }

        if dedup.debug_logging {
            info!("  Debug logging: enabled (development only)");
        }

        if !dedup.multi_value_headers.is_empty() {
            info!("  Extra multi-value headers: {}", dedup.multi_value_headers.join(", "));
        }

        if !dedup.critical_headers.is_empty() {
            info!("  Extra critical headers: {}", dedup.critical_headers.join(", "));
        }
    }
}
