//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (upstream is reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::relay::state::AppState;

/// Full health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub upstream: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the upstream script service is reachable.
/// Any HTTP response counts as reachable; only connection-level failures
/// mark the relay not ready.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_upstream(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with upstream details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let upstream_ok = check_upstream(&state).await;

    let upstream_status = if upstream_ok { "ok" } else { "unreachable" };
    let overall_status = if upstream_ok { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: overall_status.to_string(),
        upstream: upstream_status.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Check that the upstream URL is configured and answers at all
async fn check_upstream(state: &AppState) -> bool {
    if state.config.upstream.url.is_empty() {
        return false;
    }

    state
        .http
        .get(&state.config.upstream.url)
        .send()
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
