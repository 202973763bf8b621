//! Result and error types for locator operations.

use thiserror::Error;

/// Result type for locator operations
pub type LocatorResult<T> = Result<T, LocatorError>;

/// Errors that can occur during locator operations
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Snapshot could not be parsed
    #[error("Snapshot parse error: {message}")]
    SnapshotParse {
        /// Error message
        message: String,
    },

    /// Requested element is not present in the snapshot
    #[error("Element not found: {identifier}")]
    ElementNotFound {
        /// The uid or id that failed to resolve
        identifier: String,
    },

    /// Driver operation failed
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocatorError {
    /// Creates a snapshot parse error
    pub fn snapshot_parse(message: impl Into<String>) -> Self {
        Self::SnapshotParse {
            message: message.into(),
        }
    }

    /// Creates an element-not-found error
    pub fn element_not_found(identifier: impl Into<String>) -> Self {
        Self::ElementNotFound {
            identifier: identifier.into(),
        }
    }

    /// Creates a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}
