//! Error types for loading timeline inputs
//!
//! Curve computation itself never fails: missing or malformed duration data
//! degrades to a simpler shape. Errors only surface at the edges, when
//! reading experience documents or validating duration ranges strictly.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating timeline inputs
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Failed to read a document from disk
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML for the expected schema
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Duration range with min greater than max
    #[error("Invalid {field} range: min {min} > max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Negative, NaN or infinite duration bound
    #[error("Non-finite or negative {field} bound: {value}")]
    NonFiniteValue { field: String, value: f64 },

    /// A validation error inside a named part of a document
    #[error("{context}: {source}")]
    Invalid {
        context: String,
        #[source]
        source: Box<TimelineError>,
    },
}

impl TimelineError {
    /// Wrap this error with the document location it came from
    pub fn within(self, context: impl Into<String>) -> Self {
        TimelineError::Invalid {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for timeline input operations
pub type TimelineResult<T> = Result<T, TimelineError>;
