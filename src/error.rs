//! Error types for the Velin server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No copies available: {0}")]
    NoCopiesAvailable(String),

    #[error("Already returned: {0}")]
    AlreadyReturned(String),

    #[error("Renewal already pending: {0}")]
    AlreadyPending(String),

    #[error("Renewal already resolved: {0}")]
    AlreadyResolved(String),

    #[error("Renewal limit reached: {0}")]
    RenewalLimitReached(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind for API consumers
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::NoCopiesAvailable(_) => "no_copies_available",
            AppError::AlreadyReturned(_) => "already_returned",
            AppError::AlreadyPending(_) => "already_pending",
            AppError::AlreadyResolved(_) => "already_resolved",
            AppError::RenewalLimitReached(_) => "renewal_limit_reached",
            AppError::Validation(_) => "validation",
            AppError::BadRequest(_) => "bad_request",
            AppError::Database(_) => "store_failure",
            AppError::Internal(_) => "internal",
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoCopiesAvailable(_) => StatusCode::CONFLICT,
            AppError::AlreadyReturned(_) => StatusCode::CONFLICT,
            AppError::AlreadyPending(_) => StatusCode::CONFLICT,
            AppError::AlreadyResolved(_) => StatusCode::CONFLICT,
            AppError::RenewalLimitReached(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            // Store failures are logged above; the caller only learns the kind.
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
