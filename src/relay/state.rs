//! Application State
//!
//! Shared state accessible by all relay handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::Config;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// HTTP client used for upstream calls
    pub http: reqwest::Client,
    /// Relay configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState from configuration
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(
                config.upstream.request_timeout_ms,
            ))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Build the upstream URL, appending the raw query string unchanged
    pub fn upstream_url(&self, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.config.upstream.url, q),
            _ => self.config.upstream.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state_with_upstream(url: &str) -> AppState {
        let mut config = Config::default();
        config.upstream.url = url.to_string();
        AppState::new(config)
    }

    #[test]
    fn test_upstream_url_without_query() {
        let state = state_with_upstream("https://script.example.com/exec");
        assert_eq!(
            state.upstream_url(None),
            "https://script.example.com/exec"
        );
        assert_eq!(
            state.upstream_url(Some("")),
            "https://script.example.com/exec"
        );
    }

    #[test]
    fn test_upstream_url_passes_query_through() {
        let state = state_with_upstream("https://script.example.com/exec");
        assert_eq!(
            state.upstream_url(Some("action=getInventory")),
            "https://script.example.com/exec?action=getInventory"
        );
        // Already-encoded values must not be touched
        assert_eq!(
            state.upstream_url(Some("action=login&user=a%20b&pass=x%26y")),
            "https://script.example.com/exec?action=login&user=a%20b&pass=x%26y"
        );
    }
}
