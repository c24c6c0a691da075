//! Observability for the header service.
//!
//! Logging goes through `tracing` (see [`crate::logging`]); this module
//! provides the Prometheus side.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use header_dedup::observability::HeaderMetrics;
//! use header_dedup::HeaderDeduplicationService;
//!
//! let metrics = Arc::new(HeaderMetrics::new()?);
//! let mut service = HeaderDeduplicationService::default().with_metrics(metrics.clone());
//! // ... process headers ...
//! println!("{}", metrics.export());
//! ```

pub mod metrics;

pub use metrics::HeaderMetrics;
