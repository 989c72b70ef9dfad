//! Error types for run execution

use playdeck_api_types::RecordId;
use playdeck_storage::StorageError;
use thiserror::Error;

/// Result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Run execution errors
///
/// Only failures that happen before a run exists are returned to callers.
/// Once a run has been accepted, every failure is folded into its terminal
/// state and reported on the event stream instead.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to prepare run resources: {0}")]
    ResourceCreation(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Run {0} is not streaming")]
    NotStreaming(RecordId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExecutionError {
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidInput(format!("{field} is required"))
    }
}
