//! Error types for queue operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for all queue operations.
///
/// The taxonomy is deliberately small. Lock contention, candidates that
/// vanish mid-scan, and transient per-candidate I/O faults are *not* errors:
/// the leasing scan skips such candidates and keeps going. Callers only ever
/// see a fatal storage fault (a push that could not persist the message must
/// never fail silently) or a validation failure on an identifier.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("storage fault during {operation} on '{}': {source}", path.display())]
    StorageFault {
        operation: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationError),
}

impl QueueError {
    /// Build a storage fault for a failed filesystem operation.
    pub(crate) fn storage_fault(operation: &'static str, path: &Path, source: io::Error) -> Self {
        Self::StorageFault {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Validation errors for queue names and receipt handles.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
