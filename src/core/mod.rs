//! Core header types.
//!
//! - [`RawHeaders`] - headers as received from a transport, duplicates allowed
//! - [`CanonicalHeaders`] - one entry per logical header, keyed by canonical name
//! - [`HeaderValue`] - a single value or an ordered list of values
//! - [`PolicyTable`] - which headers accumulate values and which are critical
//! - [`HeaderError`] - errors raised while processing headers
//!
//! # Example
//!
//! ```rust
//! use header_dedup::core::{canonicalize, RawHeaders};
//!
//! let raw = RawHeaders::new()
//!     .with("content-type", "text/html")
//!     .with("Set-Cookie", "a=1");
//! assert_eq!(raw.len(), 2);
//! assert_eq!(canonicalize("content-type").as_deref(), Some("Content-Type"));
//! ```

mod error;
mod headers;
mod name;
mod policy;

pub use error::{HeaderError, Result};
pub use headers::{CanonicalHeaders, HeaderValue, RawHeaders};
pub use name::{canonicalize, is_valid_header_name, logically_equal};
pub use policy::{PolicyTable, ValuePolicy, DEFAULT_CRITICAL_HEADERS, DEFAULT_MULTI_VALUE_HEADERS};
