//! API error types
//!
//! Structured error responses for the HTTP API. Every error serializes as
//! `{error, message}` with a machine-readable code; no internals leak.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use beacon_registry::RegistryError;
use beacon_store::StoreError;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body, missing field or bad query parameter
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid API key
    #[error("authentication required")]
    Unauthorized,

    /// Origin not allowed for this application
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown application id
    #[error("not found: {0}")]
    NotFound(String),

    /// Application name hashes to an existing id
    #[error("conflict: {0}")]
    Conflict(String),

    /// A store scan would visit too many files
    #[error("range too wide: {0}")]
    OverRange(String),

    /// Filesystem read/write failure
    #[error("storage failure: {0}")]
    Persist(String),

    /// JSON encode failure or other internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::OverRange(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::OverRange(_) => "OVER_RANGE",
            Self::Persist(_) => "PERSIST_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} '{}' not found", entity, id))
    }

    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Conflict { .. } => Self::Conflict(e.to_string()),
            RegistryError::NotFound(id) => Self::not_found("application", &id),
            RegistryError::Encode(_) => Self::Internal(e.to_string()),
            RegistryError::Load { .. } | RegistryError::Parse { .. } | RegistryError::Save { .. } => {
                Self::Persist(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::OverRange { .. } => Self::OverRange(e.to_string()),
            StoreError::Encode { .. } => Self::Internal(e.to_string()),
            _ => Self::Persist(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code (machine-readable)
    pub error: &'static str,
    /// Error message (human-readable)
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };

        tracing::warn!(
            error_code = body.error,
            error_message = %body.message,
            status = %status,
            "API error"
        );

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
