//! Application error handling
//!
//! This module converts service failures into HTTP responses. Every error
//! body has the same tagged shape, `{"kind": ..., "message": ...}`.
//!
//! Operation messages (including backing store errors) are returned to the
//! caller verbatim.

use crate::services::AuthError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regauth_shared::{ErrorKind, ErrorResponse};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}: {1}")]
    NotFound(ErrorKind, String),

    #[error("{0}: {1}")]
    Unauthorized(ErrorKind, String),

    #[error("{0}: {1}")]
    Forbidden(ErrorKind, String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// Operation failure whose message is passed through to the caller
    #[error("{0}: {1}")]
    Failed(ErrorKind, String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(..) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(..) => StatusCode::FORBIDDEN,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Failed(..) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Kind tag reported in the body
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::ValidationError,
            ApiError::NotFound(kind, _)
            | ApiError::Unauthorized(kind, _)
            | ApiError::Forbidden(kind, _)
            | ApiError::Failed(kind, _) => *kind,
            ApiError::TooManyRequests(_) => ErrorKind::RateLimited,
            ApiError::Internal(_) => ErrorKind::InternalError,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::NoSuchUser(msg) => ApiError::NotFound(kind, msg),
            AuthError::WrongPassword | AuthError::Token(_) => ApiError::Unauthorized(kind, message),
            AuthError::DuplicateEmail
            | AuthError::NotificationFailed(_)
            | AuthError::Repository(_) => ApiError::Failed(kind, message),
            AuthError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match &self {
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
            ApiError::Failed(kind, msg) => {
                error!(kind = %kind, "Operation failed: {}", msg);
                msg.clone()
            }
            ApiError::Validation(msg) | ApiError::TooManyRequests(msg) => msg.clone(),
            ApiError::NotFound(_, msg)
            | ApiError::Unauthorized(_, msg)
            | ApiError::Forbidden(_, msg) => msg.clone(),
        };

        (status, Json(ErrorResponse::new(kind, message))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
