//! Request extractors

use crate::error::ApiError;
use axum::extract::FromRequest;

/// `Json` whose rejections use the tagged error body
///
/// A body that is not JSON becomes a `ValidationError` instead of axum's
/// plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
