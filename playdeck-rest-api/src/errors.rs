//! REST API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use playdeck_execution::ExecutionError;
use playdeck_storage::StorageError;
use playdeck_web::{errors::error_response, WebError};
use thiserror::Error;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalError(String),

    #[error(transparent)]
    Web(#[from] WebError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Conflict(_) => StatusCode::CONFLICT,
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Web(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RestError::BadRequest(_) => "BAD_REQUEST",
            RestError::NotFound(_) => "NOT_FOUND",
            RestError::Conflict(_) => "CONFLICT",
            RestError::InternalError(_) => "INTERNAL_ERROR",
            RestError::Web(e) => e.error_code(),
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidInput(msg) => RestError::BadRequest(msg),
            StorageError::NotFound { .. } => RestError::NotFound(err.to_string()),
            StorageError::InvalidTransition { .. } => RestError::Conflict(err.to_string()),
            StorageError::Io(e) => RestError::InternalError(format!("I/O error: {e}")),
        }
    }
}

impl From<ExecutionError> for RestError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::InvalidInput(msg) => RestError::BadRequest(msg),
            ExecutionError::NotStreaming(_) => RestError::NotFound(err.to_string()),
            ExecutionError::Storage(e) => e.into(),
            ExecutionError::ResourceCreation(_) | ExecutionError::Process(_) => {
                RestError::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        if let RestError::Web(e) = self {
            return e.into_response();
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        error_response(status, self.error_code(), &self.to_string())
    }
}
