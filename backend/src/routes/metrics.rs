//! Prometheus metrics endpoint

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use regauth_shared::ErrorKind;

/// Render counters in the Prometheus text format
///
/// 404 when no recorder was installed at startup.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics()
        .map(|handle| handle.render())
        .ok_or_else(|| {
            ApiError::NotFound(ErrorKind::NotFound, "Metrics are disabled".to_string())
        })
}
