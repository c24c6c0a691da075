//! Conversion between [`http::HeaderMap`] and this crate's header types.
//!
//! Runtime adapters usually hold headers in an `http::HeaderMap`. These
//! helpers move them in and out of [`RawHeaders`] / [`CanonicalHeaders`]
//! without the caller touching individual entries.
//!
//! # Usage
//!
//! ```rust
//! use header_dedup::bridge;
//! use header_dedup::HeaderDeduplicationService;
//! use http::header::{HeaderMap, HeaderValue};
//!
//! let mut map = HeaderMap::new();
//! map.append("set-cookie", HeaderValue::from_static("a=1"));
//! map.append("set-cookie", HeaderValue::from_static("b=2"));
//!
//! let mut service = HeaderDeduplicationService::default();
//! let canonical = service
//!     .deduplicate_headers(&bridge::raw_from_http(&map))
//!     .unwrap();
//!
//! let back = bridge::to_http(&canonical).unwrap();
//! assert_eq!(back.get_all("set-cookie").iter().count(), 2);
//! ```

use http::header::{HeaderMap, HeaderName, HeaderValue as HttpHeaderValue};

use crate::core::{CanonicalHeaders, HeaderError, HeaderValue, RawHeaders, Result};

/// Copy every entry of `map` into [`RawHeaders`], preserving order.
///
/// `HeaderMap` already groups names case-insensitively, so repeated names
/// arrive as consecutive entries. Values that are not visible ASCII are
/// decoded lossily.
pub fn raw_from_http(map: &HeaderMap) -> RawHeaders {
    let mut raw = RawHeaders::with_capacity(map.len());
    for (name, value) in map.iter() {
        let value = match value.to_str() {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        raw.push(name.as_str(), value);
    }
    raw
}

/// Build [`RawHeaders`] from `(name, value)` pairs.
pub fn raw_from_pairs<I, K, V>(pairs: I) -> RawHeaders
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<HeaderValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Convert canonical headers into an `http::HeaderMap`.
///
/// Multi-valued headers are appended once per value. Fails with
/// [`HeaderError::InvalidHeaderName`] or [`HeaderError::InvalidHeaderValue`]
/// when an entry is not representable on the wire.
pub fn to_http(headers: &CanonicalHeaders) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| HeaderError::InvalidHeaderName {
                name: name.to_string(),
            })?;

        for v in value.iter() {
            let header_value =
                HttpHeaderValue::from_str(v).map_err(|_| HeaderError::InvalidHeaderValue {
                    name: name.to_string(),
                    value: v.to_string(),
                })?;
            map.append(header_name.clone(), header_value);
        }
    }

    Ok(map)
}
