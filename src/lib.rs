//! # StokLink Relay
//!
//! A one-hop HTTP forwarder that sits between the StokLink dashboard and the
//! spreadsheet-backed script service holding all inventory business logic.
//!
//! The script service does not emit CORS headers, so the browser cannot call
//! it directly. The relay forwards reads (GET + query string) and writes
//! (POST + JSON body) unchanged and returns the upstream JSON response with
//! permissive CORS headers. It adds no business logic of its own.
//!
//! ## Modules
//!
//! - [`config`]: TOML + environment configuration
//! - [`relay`]: Axum router, forwarding handler and health endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stoklink::config::Config;
//! use stoklink::relay::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let state = AppState::new(config);
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod relay;

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, UpstreamConfig};
pub use relay::{build_router, serve, AppState, RelayError, RelayResult};
