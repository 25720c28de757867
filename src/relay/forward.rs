//! Forwarding Handler
//!
//! Forwards dashboard requests to the upstream script service unchanged.
//! Reads arrive as GET with an `action` query parameter, writes as POST with
//! a JSON body; both come back as JSON. The relay never inspects either.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::state::AppState;

/// ANY /api
///
/// Forward the request to the configured upstream URL, preserving the query
/// string and body byte-for-byte, and return the upstream response body with
/// a JSON content type. CORS headers are applied by the router layer.
pub async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResult<impl IntoResponse> {
    if state.config.upstream.url.is_empty() {
        return Err(RelayError::UpstreamNotConfigured);
    }

    let url = state.upstream_url(query.as_deref());

    let request = match method {
        Method::GET => state.http.get(&url),
        Method::POST => {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/json")
                .to_string();
            state
                .http
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body)
        }
        other => return Err(RelayError::MethodNotAllowed(other.to_string())),
    };

    tracing::debug!(method = %method, url = %url, "Forwarding request upstream");

    let response = request.send().await?;
    // reqwest and axum are on different `http` major versions, so the status
    // crosses the boundary as a raw u16
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let payload = response.bytes().await?;

    tracing::debug!(status = %status, bytes = payload.len(), "Upstream responded");

    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    ))
}
