//! Error taxonomy for the Regauth API
//!
//! Every failed request is answered with the same tagged body:
//! `{"kind": "<ErrorKind>", "message": "<text>"}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of failure reported to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    DuplicateEmail,
    NoSuchUser,
    WrongPassword,
    TokenInvalid,
    TokenExpired,
    MissingToken,
    Forbidden,
    NotificationFailed,
    RepositoryError,
    RateLimited,
    NotFound,
    InternalError,
}

impl ErrorKind {
    /// Tag as it appears in the `kind` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::DuplicateEmail => "DuplicateEmail",
            ErrorKind::NoSuchUser => "NoSuchUser",
            ErrorKind::WrongPassword => "WrongPassword",
            ErrorKind::TokenInvalid => "TokenInvalid",
            ErrorKind::TokenExpired => "TokenExpired",
            ErrorKind::MissingToken => "MissingToken",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotificationFailed => "NotificationFailed",
            ErrorKind::RepositoryError => "RepositoryError",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
