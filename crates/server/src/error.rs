//! Unified error handling with Sentry integration.
//!
//! Every failure of the listing endpoint is an [`AppError`]. The variants
//! keep validation and persistence failures apart internally, but the client
//! sees one uniform response for both:
//!
//! ```text
//! 500 { "success": false, "error": "Server Error" }
//! ```

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_core::ErrorResponse;
use thiserror::Error;

use crate::db::RepositoryError;

/// Message returned to clients for any failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Server Error";

/// Application-level error type for the listing server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request could not be turned into a listing query.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The product store failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

impl AppError {
    /// HTTP status for this error. Every kind is currently a server error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        (
            self.status(),
            Json(ErrorResponse::new(GENERIC_ERROR_MESSAGE)),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
