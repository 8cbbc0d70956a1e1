//! API request and response types
//!
//! Request fields default to empty strings so that a missing field reaches
//! validation and is reported as a `ValidationError` instead of a JSON
//! extractor rejection.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status value returned by every successful operation
pub const SUCCESS_STATUS: &str = "Success";

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Forgot password request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Reset password request (id and token travel in the path)
///
/// The password is checked only after the token, so it is not validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Status")]
    pub status: String,
    pub role: String,
}

impl LoginResponse {
    pub fn success(role: impl Into<String>) -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
            role: role.into(),
        }
    }
}

/// Plain status response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "Status")]
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_missing_fields_default_to_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
        assert!(req.role.is_empty());
    }

    #[test]
    fn test_login_response_uses_capitalized_status() {
        let json = serde_json::to_value(LoginResponse::success("admin")).unwrap();
        assert_eq!(json["Status"], "Success");
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_status_response_shape() {
        let json = serde_json::to_string(&StatusResponse::success()).unwrap();
        assert_eq!(json, r#"{"Status":"Success"}"#);
    }
}
