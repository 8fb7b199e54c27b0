//! # API Error Types
//!
//! Maps [`AuthError`] to HTTP status codes and structured JSON bodies.
//! Authentication failures share a single uninformative message; their
//! machine-readable `code` distinguishes lifecycle outcomes only as far
//! as the core's failure policy allows. Internal details never reach
//! clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use zkid_core::AuthError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "CHALLENGE_CONSUMED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type implementing [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Request could not be parsed or failed validation (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Registration conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication failure (401), carrying the core outcome.
    #[error("unauthorized: {0}")]
    Auth(AuthError),

    /// Internal server error (500). Logged, never echoed to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Auth(err) => {
                let code = match err {
                    AuthError::UnknownChallenge => "CHALLENGE_UNKNOWN",
                    AuthError::ExpiredChallenge => "CHALLENGE_EXPIRED",
                    AuthError::AlreadyConsumed => "CHALLENGE_CONSUMED",
                    _ => "AUTH_FAILED",
                };
                (StatusCode::UNAUTHORIZED, code)
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Auth failures share one message; internal messages never leak.
        let message = match &self {
            Self::Auth(_) => "Authentication failed".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => Self::BadRequest(msg),
            AuthError::DuplicateUser => Self::Conflict(err.to_string()),
            AuthError::Internal(msg) => Self::Internal(msg),
            other => Self::Auth(other),
        }
    }
}
