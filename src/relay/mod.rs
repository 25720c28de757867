//! StokLink Relay HTTP layer
//!
//! One-hop forwarder in front of the spreadsheet script service, built with
//! Axum. The browser cannot call the script service directly (no CORS
//! headers upstream), so the dashboard talks to this relay instead.
//!
//! # Endpoints
//!
//! ## Forwarding
//! - `GET /api?...` - Forwarded upstream with the query string unchanged
//! - `POST /api` - Forwarded upstream with the JSON body unchanged
//!
//! ## Health
//! - `GET /health/live` - Liveness probe (process is alive)
//! - `GET /health/ready` - Readiness probe (upstream reachable)
//! - `GET /health` - Full health status

pub mod error;
pub mod forward;
pub mod health;
pub mod state;

pub use error::{RelayError, RelayResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the relay router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let shared_state = Arc::new(state);

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/", get(health::full_health));

    Router::new()
        .route("/api", any(forward::forward))
        .layer(DefaultBodyLimit::max(max_body))
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the relay server
pub async fn serve(state: AppState) -> Result<(), RelayError> {
    let addr = state.config.server.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("StokLink relay listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("StokLink relay shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{Body, Bytes},
        extract::RawQuery,
        http::{Method, Request, StatusCode},
        Json,
    };
    use std::sync::Mutex;
    use tower::util::ServiceExt;

    /// What the throwaway upstream saw, for forwarding assertions
    #[derive(Clone, Debug)]
    struct RecordedRequest {
        method: String,
        query: String,
        body: String,
    }

    /// Spawn a tiny upstream on an ephemeral port that records whatever
    /// reaches it and answers with a fixed JSON body.
    async fn spawn_upstream() -> (String, Arc<Mutex<Option<RecordedRequest>>>) {
        let recorded = Arc::new(Mutex::new(None));
        let rec = Arc::clone(&recorded);

        let app = Router::new().route(
            "/exec",
            any(
                move |method: Method, RawQuery(query): RawQuery, body: Bytes| {
                    let rec = Arc::clone(&rec);
                    async move {
                        *rec.lock().unwrap() = Some(RecordedRequest {
                            method: method.to_string(),
                            query: query.unwrap_or_default(),
                            body: String::from_utf8_lossy(&body).to_string(),
                        });
                        Json(serde_json::json!({ "status": "ok" }))
                    }
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/exec", addr), recorded)
    }

    fn test_router(upstream_url: &str) -> Router {
        let mut config = Config::default();
        config.upstream.url = upstream_url.to_string();
        build_router(AppState::new(config))
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = test_router("");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_router("");

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unconfigured_upstream_is_unavailable() {
        let app = test_router("");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api?action=getInventory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let (url, _recorded) = spawn_upstream().await;
        let app = test_router(&url);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = test_router("");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header("Origin", "http://localhost:8091")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_forward_get_passes_query_through() {
        let (url, recorded) = spawn_upstream().await;
        let app = test_router(&url);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api?action=getHistory&location=KPH")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let rec = recorded.lock().unwrap().clone().unwrap();
        assert_eq!(rec.method, "GET");
        assert_eq!(rec.query, "action=getHistory&location=KPH");
        assert!(rec.body.is_empty());
    }

    #[tokio::test]
    async fn test_forward_post_passes_body_through() {
        let (url, recorded) = spawn_upstream().await;
        let app = test_router(&url);

        let payload = r#"{"action":"checkout","from":"GUDANG","to":"KPH","cart":[]}"#;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let rec = recorded.lock().unwrap().clone().unwrap();
        assert_eq!(rec.method, "POST");
        assert_eq!(rec.body, payload);
    }
}
