//! Error types for TanyaKakGem
//!
//! `AppError` covers everything that halts a request. Failures of the remote
//! model call are not in here: they are `llm::ModelError` values and end up
//! as a substitute assistant message instead of an HTTP error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Prompt shown when no credential was supplied at all
pub const MISSING_API_KEY_MESSAGE: &str =
    "Please add your Google AI API key in the sidebar to start chatting.";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    #[error("Invalid API Key or configuration error: {0}")]
    InvalidApiKey(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Status code and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingApiKey => (StatusCode::UNAUTHORIZED, "MISSING_API_KEY"),
            AppError::InvalidApiKey(_) => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
