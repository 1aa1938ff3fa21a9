//! Error types for the completion gateway
//!
//! This module defines the request-level error type and its HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::completion::CompletionError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Error calling completion API: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
///
/// `detail` mirrors `error.message` for clients that only read the flat field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "UPSTREAM_UNAVAILABLE")]
    pub code: String,
    pub message: String,
    /// Whether repeating the request could succeed
    pub retryable: bool,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, bool) {
        match self {
            AppError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", false),
            AppError::Completion(e) => {
                let (status, code) = match e {
                    CompletionError::Transport(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
                    CompletionError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
                    CompletionError::RateLimited { .. } => {
                        (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_RATE_LIMITED")
                    }
                    CompletionError::Auth => (StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_FAILED"),
                    CompletionError::InvalidResponse(_) => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_INVALID_RESPONSE")
                    }
                    CompletionError::SchemaViolation { .. } => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_SCHEMA_VIOLATION")
                    }
                    CompletionError::Unknown { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR")
                    }
                };
                (status, code, e.is_retryable())
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", false),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = self.parts();

        let mut headers = HeaderMap::new();
        if let AppError::Completion(CompletionError::RateLimited {
            retry_after: Some(secs),
            ..
        }) = &self
        {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                headers.insert(RETRY_AFTER, value);
            }
        }

        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            detail: message.clone(),
            error: ErrorBody {
                code: code.to_string(),
                message,
                retryable,
            },
        };

        (status, headers, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
