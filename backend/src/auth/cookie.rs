//! Session cookie helpers
//!
//! The session token travels in a cookie named `token`. It is `HttpOnly`,
//! `Secure` and `SameSite=None` so the front-end on another origin can send it
//! with credentialed requests. No `Max-Age` is set: the token's own `exp`
//! bounds the session.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

/// Cookie name for session tokens.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Build the `Set-Cookie` value for a session token.
///
/// Browsers drop `SameSite=None` cookies that are not `Secure`, so an
/// insecure (local development) cookie falls back to `SameSite=Lax`.
#[must_use]
pub fn create_session_cookie(token: &str, secure: bool) -> String {
    if secure {
        format!("{SESSION_COOKIE_NAME}={token}; HttpOnly; Secure; SameSite=None; Path=/")
    } else {
        format!("{SESSION_COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/")
    }
}

/// Set the session cookie in response headers.
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, secure: bool) {
    if let Ok(value) = HeaderValue::from_str(&create_session_cookie(token, secure)) {
        headers.append(SET_COOKIE, value);
    }
}

/// Extract the session token from request cookies.
///
/// Looks through every `Cookie` header; an empty value counts as absent.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|part| part.trim().strip_prefix("token="))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
