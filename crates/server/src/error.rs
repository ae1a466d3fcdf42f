//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers and services
//! return `Result<T, AppError>`.
//!
//! Validation and ownership failures are structured values rendered as
//! `{"success": false, "message": ...}` with a 4xx status; store failures are
//! rendered as a generic 500 with the underlying message kept server-side.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the CARIT service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input was missing or empty.
    #[error("{0}")]
    InvalidArgument(String),

    /// A referenced user or entity is absent.
    #[error("{0}")]
    NotFound(String),

    /// Ownership check failed (vehicle not in the caller's garage).
    #[error("{0}")]
    Forbidden(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Document store operation failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The JSON failure body shared by all error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Repository(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            // Ownership failures share the 400 wire contract of the garage
            // endpoints even though they are a distinct taxonomy entry.
            Self::InvalidArgument(_) | Self::Forbidden(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
