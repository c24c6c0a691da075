//! Header processing error types.

use std::fmt;

/// Errors raised while normalizing, deduplicating or converting headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Header name is empty after trimming, or not a valid token in strict mode.
    InvalidHeaderName { name: String },

    /// Strict mode: an override header carried more than one distinct value.
    ConflictResolutionAmbiguity { name: String, values: Vec<String> },

    /// One element of a batch failed; the rest of the batch was processed.
    BatchItemFailure {
        index: usize,
        source: Box<HeaderError>,
    },

    /// Header value cannot be represented as an `http::HeaderValue`.
    InvalidHeaderValue { name: String, value: String },
}

impl HeaderError {
    /// Wrap an error as the failure of batch element `index`.
    pub fn batch_item(index: usize, source: HeaderError) -> Self {
        HeaderError::BatchItemFailure {
            index,
            source: Box::new(source),
        }
    }

    /// Short machine-friendly kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            HeaderError::InvalidHeaderName { .. } => "invalid_name",
            HeaderError::ConflictResolutionAmbiguity { .. } => "ambiguous_conflict",
            HeaderError::BatchItemFailure { .. } => "batch_item",
            HeaderError::InvalidHeaderValue { .. } => "invalid_value",
        }
    }
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::InvalidHeaderName { name } => {
                write!(f, "invalid header name: '{}'", name)
            }
            HeaderError::ConflictResolutionAmbiguity { name, values } => {
                write!(
                    f,
                    "ambiguous conflict for {}: {} distinct values ({})",
                    name,
                    values.len(),
                    values.join(" | ")
                )
            }
            HeaderError::BatchItemFailure { index, source } => {
                write!(f, "batch item {} failed: {}", index, source)
            }
            HeaderError::InvalidHeaderValue { name, value } => {
                write!(f, "invalid value for header {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for HeaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeaderError::BatchItemFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias for header operations.
pub type Result<T> = std::result::Result<T, HeaderError>;
