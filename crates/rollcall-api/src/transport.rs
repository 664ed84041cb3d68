// Shared transport configuration for building reqwest::Client instances.
//
// The API client and the discovery probes share timeout and user-agent
// settings through this module, avoiding duplicated builder logic.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
///
/// The `timeout` applies per request and hard-cancels the underlying
/// connection when it fires. Discovery probes override it per call with a
/// much shorter deadline via `RequestBuilder::timeout`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Config with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("rollcall/0.1.0")
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
