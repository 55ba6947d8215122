//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from rodo-core, rodo-scoring and rodo-state to HTTP
//! status codes with a JSON body carrying an error code, a message and
//! optional details. Internal error details never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use rodo_core::RodoError;
use rodo_scoring::ScoringError;
use rodo_state::{ActionError, HistoryError, RegistryError, StatusError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Conflict(_) => tracing::info!(error = %self, "request conflicts with current state"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

// ─── Domain error conversions ────────────────────────────────────────

impl From<RodoError> for AppError {
    fn from(err: RodoError) -> Self {
        match &err {
            RodoError::NotFound { .. } => Self::NotFound(err.to_string()),
            RodoError::Validation(_) | RodoError::InvalidValue { .. } => {
                Self::Validation(err.to_string())
            }
            RodoError::Serialization(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => Self::NotFound(err.to_string()),
            RegistryError::Duplicate(_) => Self::Conflict(err.to_string()),
            RegistryError::Invalid(inner) => Self::from(inner),
        }
    }
}

/// Lifecycle violations are conflicts with the current status.
impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match &err {
            ActionError::Validation(_) => Self::Validation(err.to_string()),
            ActionError::UnchangedStatus(_) => Self::Conflict(err.to_string()),
            ActionError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match &err {
            HistoryError::EntryNotFound(_) => Self::NotFound(err.to_string()),
            HistoryError::Validation(_) | HistoryError::SameEntry(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        Self::Validation(err.to_string())
    }
}
