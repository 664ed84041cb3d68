//! Persisted + in-memory backend URL state, and the discovery sequence that
//! fills it.
//!
//! The [`ConfigStore`] is an explicit, injectable state object: application
//! bootstrap constructs one and hands it to consumers, and each test builds
//! its own against a scratch storage path. Storage I/O failures are always
//! swallowed; the store degrades to memory/environment-only resolution
//! rather than surfacing persistence errors.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use rollcall_api::{Reachability, probe};

use crate::candidates::{API_SUFFIX, candidate_urls};
use crate::resolver::{DiscoveryConfig, resolve};

/// Absolute last-resort base URL when nothing else is available.
pub const FALLBACK_URL: &str = "http://localhost:5001/api";

/// Port used for the host-derived fallback guess.
const DEFAULT_PORT: u16 = 5001;

/// Environment variable supplying a default base URL.
const ENV_API_URL: &str = "ROLLCALL_API_URL";

/// Environment variable overriding the storage file path.
const ENV_CONFIG_PATH: &str = "ROLLCALL_CONFIG";

// ── Persisted shape ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredConfig {
    /// Normalized base URL, always ending in `/api`.
    api_url: Option<String>,
}

// ── Discovery outcome ───────────────────────────────────────────────

/// Result of a discovery pass.
///
/// `Unconfirmed` carries the hardcoded fallback after every step failed; it
/// is never cached or persisted, so the next `discover` call retries from
/// scratch. Callers should surface it as a warning, not a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Confirmed(String),
    Unconfirmed(String),
}

impl Discovery {
    pub fn url(&self) -> &str {
        match self {
            Self::Confirmed(url) | Self::Unconfirmed(url) => url,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Owns the process-lifetime URL state: in-memory cache, persisted value,
/// environment default, and optional host context for candidate generation.
pub struct ConfigStore {
    http: reqwest::Client,
    cached: Mutex<Option<String>>,
    storage_path: PathBuf,
    env_url: Option<String>,
    host: Option<String>,
    discovery: DiscoveryConfig,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Store using the canonical storage path and `ROLLCALL_API_URL` from
    /// the environment. No host context; candidates stay loopback-only
    /// until [`with_host`](Self::with_host) supplies one.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
            storage_path: storage_path(),
            env_url: std::env::var(ENV_API_URL).ok(),
            host: None,
            discovery: DiscoveryConfig::default(),
        }
    }

    /// Override the storage file (test isolation, sandboxed environments).
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Override the environment-provided default URL.
    pub fn with_env_url(mut self, env_url: Option<String>) -> Self {
        self.env_url = env_url;
        self
    }

    /// Supply the host context used for LAN candidate generation.
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    /// Override discovery tunables.
    pub fn with_discovery_config(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }

    // ── Synchronous read ─────────────────────────────────────────────

    /// Resolve the base URL without any network I/O. Never fails.
    ///
    /// Priority: in-memory cache, persisted value, environment default,
    /// host-derived guess, hardcoded loopback fallback. Repeated calls with
    /// no intervening discovery or configuration change return the same
    /// value.
    pub fn api_url(&self) -> String {
        if let Some(url) = self.cached().clone() {
            return url;
        }

        if let Some(url) = self.load_stored() {
            return url;
        }

        if let Some(url) = self.env_url.clone() {
            return url;
        }

        if let Some(host) = &self.host {
            return format!("http://{host}:{DEFAULT_PORT}{API_SUFFIX}");
        }

        FALLBACK_URL.to_owned()
    }

    // ── Discovery ────────────────────────────────────────────────────

    /// Locate a reachable backend, validating each known URL before falling
    /// back to a candidate sweep.
    ///
    /// Steps, in order, until one validates: re-probe the cached URL;
    /// probe the persisted URL (clearing it from storage on failure); probe
    /// the environment URL; run the batched resolver over the candidate
    /// list. The winner is cached and returned as [`Discovery::Confirmed`].
    ///
    /// `on_status` receives human-readable progress strings. They are
    /// advisory only: log lines for a settings screen, not a protocol.
    pub async fn discover<F: FnMut(&str)>(&self, mut on_status: F) -> Discovery {
        let mut status = |msg: &str| {
            info!("{msg}");
            on_status(msg);
        };

        // Clone out of the lock so the guard never straddles an await.
        let cached = self.cached().clone();
        if let Some(cached) = cached {
            if self.check(&cached).await.is_reachable() {
                status(&format!("Using cached URL: {cached}"));
                return Discovery::Confirmed(cached);
            }
            status("Cached URL failed health check, re-discovering...");
            *self.cached() = None;
        }

        if let Some(stored) = self.load_stored() {
            status(&format!("Validating saved URL: {stored}"));
            if self.check(&stored).await.is_reachable() {
                status(&format!("Using saved URL: {stored}"));
                *self.cached() = Some(stored.clone());
                return Discovery::Confirmed(stored);
            }
            status("Saved URL unreachable. Please verify it in Settings.");
            self.remove_stored();
        }

        if let Some(env_url) = self.env_url.clone() {
            status(&format!("Validating environment URL: {env_url}"));
            if self.check(&env_url).await.is_reachable() {
                status(&format!("Using environment URL: {env_url}"));
                *self.cached() = Some(env_url.clone());
                return Discovery::Confirmed(env_url);
            }
            status("Environment URL unreachable. Falling back to discovery.");
        }

        status("Scanning common local URLs (ports 5001, 5005, 5010)...");
        let candidates = candidate_urls(self.host.as_deref());
        if let Some(found) = resolve(&self.http, &candidates, &self.discovery).await {
            status(&format!("✓ Connected via {found}"));
            *self.cached() = Some(found.clone());
            return Discovery::Confirmed(found);
        }

        // Not cached: the next discover call must retry from scratch.
        status("⚠ No working URL found. Please set the backend URL in Settings.");
        Discovery::Unconfirmed(FALLBACK_URL.to_owned())
    }

    async fn check(&self, url: &str) -> Reachability {
        probe(&self.http, url, self.discovery.probe_timeout).await
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Save a user-provided URL: trim, strip trailing slashes, append the
    /// `/api` suffix unless already present, persist, and cache. Returns
    /// the normalized URL.
    ///
    /// Changing the backend address invalidates every in-flight assumption;
    /// callers are expected to rebuild their `ApiClient`s (and typically
    /// reload all application state) afterwards.
    pub fn set_api_url(&self, url: &str) -> String {
        let mut clean = url.trim().trim_end_matches('/').to_owned();
        if !clean.ends_with(API_SUFFIX) {
            clean.push_str(API_SUFFIX);
        }

        self.save_stored(&clean);
        *self.cached() = Some(clean.clone());
        clean
    }

    /// Clear the persisted URL and the in-memory cache. Subsequent reads
    /// fall through to environment / host / fallback resolution.
    pub fn reset(&self) {
        self.remove_stored();
        *self.cached() = None;
    }

    /// Drop only the in-memory cache, forcing the next read or discovery
    /// to consult persisted / environment sources again.
    pub fn clear_cache(&self) {
        *self.cached() = None;
    }

    /// Cache a URL directly (used by bootstrap code after an out-of-band
    /// validation). Not persisted.
    pub fn cache_url(&self, url: impl Into<String>) {
        *self.cached() = Some(url.into());
    }

    fn cached(&self) -> MutexGuard<'_, Option<String>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Storage (silent failure) ─────────────────────────────────────

    fn load_stored(&self) -> Option<String> {
        if !self.storage_path.exists() {
            return None;
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(StoredConfig::default()))
            .merge(Toml::file(&self.storage_path));

        match figment.extract::<StoredConfig>() {
            Ok(stored) => stored.api_url,
            Err(err) => {
                warn!(path = %self.storage_path.display(), %err, "ignoring unreadable config");
                None
            }
        }
    }

    fn save_stored(&self, url: &str) {
        let stored = StoredConfig {
            api_url: Some(url.to_owned()),
        };

        if let Err(err) = write_toml(&self.storage_path, &stored) {
            warn!(path = %self.storage_path.display(), %err, "failed to persist URL");
        }
    }

    fn remove_stored(&self) {
        if let Err(err) = std::fs::remove_file(&self.storage_path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.storage_path.display(), %err, "failed to clear stored URL");
            }
        }
    }
}

fn write_toml(path: &Path, stored: &StoredConfig) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(stored).map_err(std::io::Error::other)?;
    std::fs::write(path, toml_str)
}

// ── Storage path ────────────────────────────────────────────────────

/// Resolve the storage file path: `ROLLCALL_CONFIG` override first, then
/// XDG / platform conventions.
pub fn storage_path() -> PathBuf {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("com", "rollcall", "rollcall").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rollcall");
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new()
            .with_storage_path(dir.path().join("config.toml"))
            .with_env_url(None)
    }

    #[test]
    fn set_then_get_round_trips_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir);

        let normalized = store.set_api_url("  http://example.com/ ");
        assert_eq!(normalized, "http://example.com/api");
        assert_eq!(store.api_url(), "http://example.com/api");
    }

    #[test]
    fn set_does_not_double_append_suffix() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir);

        let normalized = store.set_api_url("http://example.com/api");
        assert_eq!(normalized, "http://example.com/api");

        let normalized = store.set_api_url("http://example.com/api/");
        assert_eq!(normalized, "http://example.com/api");
    }

    #[test]
    fn persisted_url_survives_a_new_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let store = ConfigStore::new()
            .with_storage_path(&path)
            .with_env_url(None);
        store.set_api_url("http://192.168.1.5:5005");

        let fresh = ConfigStore::new()
            .with_storage_path(&path)
            .with_env_url(None);
        assert_eq!(fresh.api_url(), "http://192.168.1.5:5005/api");
    }

    #[test]
    fn reset_falls_back_to_hardcoded_loopback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir);

        store.set_api_url("http://example.com");
        store.reset();

        assert_eq!(store.api_url(), FALLBACK_URL);
    }

    #[test]
    fn sync_get_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir).with_env_url(Some("http://env-host:5001/api".into()));

        let first = store.api_url();
        assert_eq!(first, store.api_url());
        assert_eq!(first, store.api_url());
    }

    #[test]
    fn priority_env_over_host_guess() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir)
            .with_env_url(Some("http://env-host:5001/api".into()))
            .with_host(Some("10.0.0.9".into()));

        assert_eq!(store.api_url(), "http://env-host:5001/api");
    }

    #[test]
    fn host_guess_when_nothing_else_available() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir).with_host(Some("10.0.0.9".into()));

        assert_eq!(store.api_url(), "http://10.0.0.9:5001/api");
    }

    #[test]
    fn cache_takes_priority_over_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = scratch_store(&dir);

        store.set_api_url("http://persisted-host:5001");
        store.cache_url("http://cached-host:5001/api");

        assert_eq!(store.api_url(), "http://cached-host:5001/api");

        store.clear_cache();
        assert_eq!(store.api_url(), "http://persisted-host:5001/api");
    }

    #[test]
    fn storage_failure_degrades_to_memory_only() {
        // Unwritable path: persistence fails silently, cache still works.
        let store = ConfigStore::new()
            .with_storage_path("/nonexistent-root/rollcall/config.toml")
            .with_env_url(None);

        let normalized = store.set_api_url("http://example.com");
        assert_eq!(normalized, "http://example.com/api");
        assert_eq!(store.api_url(), "http://example.com/api");
    }
}
