//! Errors raised while loading a data directory.

use std::path::PathBuf;

use campusnet_core::ValidationError;
use thiserror::Error;

/// Failure to turn JSON documents into validated campus data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonProviderError {
    /// A required document is absent from the data directory.
    #[error("missing `{name}` in {}", dir.display())]
    MissingDocument {
        /// Directory that was searched.
        dir: PathBuf,
        /// Primary name of the missing document.
        name: &'static str,
    },
    /// A document exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A document is not valid JSON of the expected shape.
    #[error("failed to parse {document}: {source}")]
    Parse {
        /// Name or path of the document.
        document: String,
        /// Underlying parse error, including line and column.
        #[source]
        source: serde_json::Error,
    },
    /// The parsed records were rejected by core validation.
    #[error("invalid campus data: {0}")]
    Validation(#[from] ValidationError),
}

impl JsonProviderError {
    /// Returns a stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingDocument { .. } => "JSON_MISSING_DOCUMENT",
            Self::Io { .. } => "JSON_IO",
            Self::Parse { .. } => "JSON_PARSE",
            Self::Validation(error) => error.code().as_str(),
        }
    }
}
