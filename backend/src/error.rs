//! Error types and error handling for the application
//!
//! Every handler returns `Result<_, AppError>`. Errors render as a JSON
//! envelope `{"message": ...}`; unexpected failures are logged and reported
//! with a generic message so store details never reach the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message sent to clients for any unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error!";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Client input was rejected (malformed id, failed validation,
    /// unresolved reference, or a write against a missing record)
    #[error("{0}")]
    BadRequest(String),

    /// The requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(message) | AppError::NotFound(message) => message,
            AppError::Internal(error) => {
                tracing::error!(error = %format!("{:#}", error), "Unhandled failure");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
