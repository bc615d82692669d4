//! Error types and error handling for the application
//!
//! This module defines the error type returned by every HTTP handler.
//! All errors implement `IntoResponse` and render as `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::completion::CompletionError;
use crate::store::StoreError;

/// Application-level error types
///
/// Each variant maps to exactly one HTTP status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Rename payload was missing, empty or not a string
    #[error("Invalid chat name")]
    InvalidChatName,

    /// Request body could not be parsed into the expected shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or rejected bearer credential
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Caller does not own the chat, or the chat does not exist
    #[error("{0}")]
    Forbidden(String),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Completion provider call failed
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidChatName | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
