//! Session extractors
//!
//! Reads the session cookie, verifies it with the pre-computed keys in
//! AppState and exposes the claims to handlers.
//!
//! A missing cookie is 401. A cookie that does not verify, and a valid
//! session without the admin role, are both 403.

use super::cookie::extract_session_cookie;
use super::jwt::TokenError;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRef, http::request::Parts};
use regauth_shared::{ErrorKind, ADMIN_ROLE};
use tracing::debug;

/// Caller holding a valid session token
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
    pub role: String,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_session_cookie(&parts.headers).ok_or_else(|| {
            ApiError::Unauthorized(ErrorKind::MissingToken, "Token is Missing".to_string())
        })?;

        let claims = app_state
            .tokens()
            .verify_session_token(&token)
            .map_err(|e| {
                debug!(error = %e, "Rejected session token");
                let kind = match e {
                    TokenError::Expired => ErrorKind::TokenExpired,
                    TokenError::Invalid(_) => ErrorKind::TokenInvalid,
                };
                ApiError::Forbidden(kind, "Error with Token".to_string())
            })?;

        Ok(SessionUser {
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Caller holding a valid session token with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;

        if user.role != ADMIN_ROLE {
            return Err(ApiError::Forbidden(
                ErrorKind::Forbidden,
                "not admin".to_string(),
            ));
        }

        Ok(AdminUser(user))
    }
}
