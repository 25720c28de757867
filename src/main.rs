//! StokLink Relay Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from a TOML file (see `config::generate_default_config`) with
//! environment variable overrides:
//! - `STOKLINK_HOST`: Host to bind to (default: 0.0.0.0)
//! - `STOKLINK_PORT`: Port to listen on (default: 8090)
//! - `STOKLINK_UPSTREAM_URL`: Deployed script service URL (required)
//! - `STOKLINK_UPSTREAM_TIMEOUT_MS`: Upstream request timeout (default: 30000)
//! - `STOKLINK_LOG_LEVEL`: Log level (default: info)
//! - `STOKLINK_LOG_FORMAT`: pretty or json (default: pretty)

use stoklink::config::Config;
use stoklink::relay::{serve, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    init_tracing(&config);

    tracing::info!("Starting StokLink relay v{}", env!("CARGO_PKG_VERSION"));

    if config.upstream.url.is_empty() {
        tracing::warn!(
            "No upstream URL configured (set STOKLINK_UPSTREAM_URL); /api will answer 503"
        );
    } else {
        tracing::info!("Forwarding /api to {}", config.upstream.url);
    }

    let state = AppState::new(config);
    serve(state).await?;

    tracing::info!("StokLink relay stopped");
    Ok(())
}

/// Initialize tracing from config, honoring RUST_LOG when set
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("stoklink={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
