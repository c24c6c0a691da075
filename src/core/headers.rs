//! Raw and canonical header collections.

use std::fmt;
use std::slice;

use indexmap::IndexMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::name::logically_equal;

/// A header value: one string, or an ordered list for repeated headers.
///
/// The empty string is a valid value. `Multi(vec![])` carries no values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// Build from a list of values: one value becomes `Single`.
    pub fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            HeaderValue::Single(values.remove(0))
        } else {
            HeaderValue::Multi(values)
        }
    }

    /// All values as a slice.
    #[inline]
    pub fn values(&self) -> &[String] {
        match self {
            HeaderValue::Single(v) => slice::from_ref(v),
            HeaderValue::Multi(vs) => vs,
        }
    }

    /// Iterate over the values as `&str`.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values().iter().map(String::as_str)
    }

    /// The single value, if this is `Single`.
    #[inline]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multi(_) => None,
        }
    }

    /// Last value in order, if any.
    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.values().last().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Check whether a byte-identical value is present.
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Single(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Single(v)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(vs: Vec<String>) -> Self {
        HeaderValue::Multi(vs)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(vs: Vec<&str>) -> Self {
        HeaderValue::Multi(vs.into_iter().map(String::from).collect())
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Single(v) => f.write_str(v),
            HeaderValue::Multi(vs) => f.write_str(&vs.join(", ")),
        }
    }
}

/// Headers as received from a transport, in arrival order.
///
/// Names are stored as given; several entries may name the same logical
/// header. The order of entries decides which value wins a conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHeaders {
    entries: Vec<(String, HeaderValue)>,
}

impl RawHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style append.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.push(name, value);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of individual values across all entries.
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N, V> FromIterator<(N, V)> for RawHeaders
where
    N: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

impl<N, V> Extend<(N, V)> for RawHeaders
where
    N: Into<String>,
    V: Into<HeaderValue>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(n, v)| (n.into(), v.into())));
    }
}

impl Serialize for RawHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// Deserialized through a visitor so JSON key order and repeated keys survive.
impl<'de> Deserialize<'de> for RawHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawHeadersVisitor;

        impl<'de> Visitor<'de> for RawHeadersVisitor {
            type Value = RawHeaders;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to values, or a list of [name, value] pairs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawHeaders, A::Error> {
                let mut headers = RawHeaders::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, HeaderValue>()? {
                    headers.entries.push((name, value));
                }
                Ok(headers)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<RawHeaders, A::Error> {
                let mut headers = RawHeaders::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_element::<(String, HeaderValue)>()? {
                    headers.entries.push((name, value));
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_any(RawHeadersVisitor)
    }
}

/// Deduplicated headers keyed by canonical name.
///
/// No two keys are logically equal. Keys keep the order in which each
/// logical header first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalHeaders {
    map: IndexMap<String, HeaderValue>,
}

impl CanonicalHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under an already canonical name, replacing any previous value.
    pub(crate) fn insert_canonical(&mut self, name: String, value: HeaderValue) {
        self.map.insert(name, value);
    }

    /// Mutable access by exact canonical name.
    pub(crate) fn get_canonical_mut(&mut self, name: &str) -> Option<&mut HeaderValue> {
        self.map.get_mut(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        if let Some(value) = self.map.get(name) {
            return Some(value);
        }
        self.map
            .iter()
            .find(|(key, _)| logically_equal(key, name))
            .map(|(_, value)| value)
    }

    /// Case-insensitive lookup of a single-valued header.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(HeaderValue::as_single)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a header by logical name, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        let index = self.map.keys().position(|key| logically_equal(key, name))?;
        self.map.shift_remove_index(index).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.map.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Flatten into `(name, value)` pairs, one pair per value.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.map.len());
        for (name, value) in &self.map {
            for v in value.iter() {
                pairs.push((name.clone(), v.to_string()));
            }
        }
        pairs
    }

    /// Convert back into raw form so the result can be processed again.
    pub fn to_raw(&self) -> RawHeaders {
        self.map
            .iter()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CanonicalHeaders {
    type Item = (&'a String, &'a HeaderValue);
    type IntoIter = indexmap::map::Iter<'a, String, HeaderValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl IntoIterator for CanonicalHeaders {
    type Item = (String, HeaderValue);
    type IntoIter = indexmap::map::IntoIter<String, HeaderValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}
