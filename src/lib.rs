//! header_dedup - HTTP header normalization and deduplication.
//!
//! This crate turns the raw header lists produced by HTTP runtimes into a
//! canonical map with exactly one entry per logical header. Header names
//! are compared case-insensitively and emitted in canonical title case.
//!
//! # Features
//!
//! - **Deduplication**: Last-wins for single-value headers, value lists for
//!   headers like `Set-Cookie`
//! - **Merging**: Combine a primary and a fallback header set
//! - **Batch Processing**: Per-item results over a shared name cache
//! - **Name Cache**: Bounded FIFO cache of canonical names with hit/miss stats
//! - **Strict Mode**: Reject ambiguous conflicts instead of resolving them
//! - **Diagnostics**: Performance snapshots and tuning suggestions
//! - **Metrics**: Optional Prometheus counters and histograms
//! - **Structured Logging**: JSON log lines via tracing
//!
//! # Example
//!
//! ```rust
//! use header_dedup::{Config, HeaderDeduplicationService, RawHeaders};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let mut service = HeaderDeduplicationService::new(config.dedup);
//!
//! let raw = RawHeaders::new()
//!     .with("set-cookie", "a=1")
//!     .with("Set-Cookie", "b=2")
//!     .with("x-request-id", "1");
//!
//! let headers = service.deduplicate_headers(&raw)?;
//! assert_eq!(headers.get("Set-Cookie").map(|v| v.len()), Some(2));
//! # Ok(())
//! # }
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full version string used in logs
pub const VERSION: &str = concat!("header_dedup ", env!("CARGO_PKG_VERSION"));

pub mod bridge;
pub mod cache;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod logging;
pub mod observability;
pub mod service;

// Re-exports for convenience
pub use config::Config;
pub use core::{CanonicalHeaders, HeaderError, HeaderValue, RawHeaders};
pub use service::{HeaderDeduplication, HeaderDeduplicationService};
