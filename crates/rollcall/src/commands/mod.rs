//! Subcommand handlers.

pub mod attendance;
pub mod config_cmd;
pub mod courses;
pub mod students;
pub mod system;

use std::time::Duration;

use rollcall_api::{ApiClient, TransportConfig};
use rollcall_config::ConfigStore;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the config store from global flags. The `--api-url` override is
/// injected as the environment-default slot so the store's priority chain
/// stays intact.
pub fn build_store(global: &GlobalOpts) -> ConfigStore {
    let store = ConfigStore::new().with_host(global.host.clone());
    match &global.api_url {
        Some(url) => store.with_env_url(Some(url.clone())),
        None => store,
    }
}

/// Build an API client against the effective base URL.
///
/// `--api-url` wins outright; otherwise the store's synchronous resolution
/// chain (cache, saved, environment, host guess, loopback fallback) applies.
pub fn build_client(global: &GlobalOpts, store: &ConfigStore) -> Result<ApiClient, CliError> {
    let base_url = global
        .api_url
        .clone()
        .unwrap_or_else(|| store.api_url());

    tracing::debug!(%base_url, "using backend");

    let transport = TransportConfig::with_timeout(Duration::from_secs(global.timeout));
    Ok(ApiClient::new(&base_url, &transport)?)
}

/// Parse an inline JSON argument into a value the client can transport.
pub fn parse_json_arg(raw: &str) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Validation {
        field: "json".into(),
        reason: e.to_string(),
    })
}
