//! Authentication routes
//!
//! Registration, login, password reset and the admin dashboard check. The
//! credential routes sit behind the rate limiter; `/dashboard` does not.

use super::extract::ApiJson;
use crate::auth::{set_session_cookie, AdminUser};
use crate::error::{ApiError, ApiResult};
use crate::services::AuthError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use regauth_shared::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    StatusResponse, SUCCESS_STATUS,
};

/// Routes that take credentials or reset tokens
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:id/:token", post(reset_password))
}

/// Routes that require a session cookie
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Register a new user
///
/// POST /register
///
/// Nothing about the account is echoed back.
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<&'static str>> {
    state.auth.register(req).await?;
    Ok(Json(SUCCESS_STATUS))
}

/// Login with email and password
///
/// POST /login
///
/// Sets the `token` session cookie.
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let outcome = state.auth.login(&req.email, &req.password).await?;

    let mut response = Json(LoginResponse::success(outcome.role)).into_response();
    set_session_cookie(
        response.headers_mut(),
        &outcome.token,
        state.config().app.cookie_secure,
    );
    Ok(response)
}

/// Mail a reset link
///
/// POST /forgot-password
async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<Json<StatusResponse>> {
    state.auth.request_password_reset(&req.email).await?;
    Ok(Json(StatusResponse::success()))
}

/// Set a new password with a mailed reset token
///
/// POST /reset-password/:id/:token
///
/// A failed update (unknown account) is reported as 500.
async fn reset_password(
    State(state): State<AppState>,
    Path((id, token)): Path<(String, String)>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<Json<StatusResponse>> {
    state
        .auth
        .complete_password_reset(&id, &token, &req.password)
        .await
        .map_err(|e| match e {
            AuthError::NoSuchUser(_) => ApiError::Failed(e.kind(), e.to_string()),
            other => other.into(),
        })?;
    Ok(Json(StatusResponse::success()))
}

/// Admin dashboard
///
/// GET /dashboard
async fn dashboard(_admin: AdminUser) -> Json<&'static str> {
    Json(SUCCESS_STATUS)
}
