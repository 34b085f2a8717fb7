//! Error types for test-vector loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vector operations
pub type Result<T> = std::result::Result<T, VectorError>;

/// Errors that can occur while loading a test vector
#[derive(Debug, Error)]
pub enum VectorError {
    /// A required resource (input, output or metadata) is missing
    #[error("Vector resource not found: {path}")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Resource exists but its content violates the vector format
    #[error("Malformed vector {path}: {reason}")]
    Malformed {
        /// Offending resource
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// Vector directory cannot be listed
    #[error("Cannot scan vector directory {path}: {source}")]
    Scan {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error while reading a resource
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl VectorError {
    /// Create a not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a malformed-vector error
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for a missing resource
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for a content error
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
