//! Conflict-resolution policy table.

use std::collections::HashSet;

use super::name::canonicalize;

/// How values of a repeated header are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Only one value survives; the last one in input order wins.
    Override,
    /// Every value is kept, in input order.
    Accumulate,
}

impl ValuePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuePolicy::Override => "override",
            ValuePolicy::Accumulate => "accumulate",
        }
    }
}

/// Headers whose repeated values are all meaningful.
pub const DEFAULT_MULTI_VALUE_HEADERS: &[&str] = &[
    "Set-Cookie",
    "Www-Authenticate",
    "Proxy-Authenticate",
    "Link",
    "Via",
    "Warning",
];

/// Headers whose dropped values are always reported.
pub const DEFAULT_CRITICAL_HEADERS: &[&str] = &[
    "Content-Type",
    "Content-Length",
    "Authorization",
    "Location",
    "Host",
    "Transfer-Encoding",
];

/// Maps canonical header names to their [`ValuePolicy`] and criticality.
///
/// Names not listed use [`ValuePolicy::Override`].
#[derive(Debug, Clone)]
pub struct PolicyTable {
    accumulate: HashSet<String>,
    critical: HashSet<String>,
}

impl PolicyTable {
    /// Build from the default sets plus extra names (any casing).
    pub fn new<'a, M, C>(extra_multi_value: M, extra_critical: C) -> Self
    where
        M: IntoIterator<Item = &'a str>,
        C: IntoIterator<Item = &'a str>,
    {
        let accumulate = DEFAULT_MULTI_VALUE_HEADERS
            .iter()
            .copied()
            .chain(extra_multi_value)
            .filter_map(canonicalize)
            .collect();
        let critical = DEFAULT_CRITICAL_HEADERS
            .iter()
            .copied()
            .chain(extra_critical)
            .filter_map(canonicalize)
            .collect();
        Self {
            accumulate,
            critical,
        }
    }

    /// Policy for a canonical name.
    #[inline]
    pub fn policy(&self, canonical: &str) -> ValuePolicy {
        if self.accumulate.contains(canonical) {
            ValuePolicy::Accumulate
        } else {
            ValuePolicy::Override
        }
    }

    /// Whether conflicts on this canonical name must be reported.
    #[inline]
    pub fn is_critical(&self, canonical: &str) -> bool {
        self.critical.contains(canonical)
    }

    /// Canonical names with the accumulate policy, sorted.
    pub fn multi_value_headers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.accumulate.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Canonical critical names, sorted.
    pub fn critical_headers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.critical.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new([], [])
    }
}
