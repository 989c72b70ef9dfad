//! Storage error types

use playdeck_api_types::{RecordId, RunStatus};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Lookup of an identifier that was never assigned
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: RecordId },

    /// Caller supplied a record that cannot be stored
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Run lifecycle violation, e.g. completing a run that never started
    #[error("Run {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: RecordId,
        from: RunStatus,
        to: RunStatus,
    },

    /// I/O errors from the template directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn not_found(kind: &'static str, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
