#![allow(clippy::unwrap_used)]
// Integration tests for the batched resolver and the ConfigStore discovery
// sequence, using wiremock backends and tempfile-backed storage.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rollcall_config::{ConfigStore, Discovery, DiscoveryConfig, FALLBACK_URL, resolve};

// ── Helpers ─────────────────────────────────────────────────────────

/// Mock backend answering 200 on /health (bare and under the /api prefix,
/// since stored URLs always carry the suffix).
async fn healthy_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

/// A candidate URL that refuses connections immediately.
fn dead_candidate(n: u16) -> String {
    format!("http://127.0.0.1:{n}/api")
}

fn fast_discovery() -> DiscoveryConfig {
    DiscoveryConfig {
        probe_timeout: Duration::from_millis(500),
        ..DiscoveryConfig::default()
    }
}

fn scratch_store(dir: &tempfile::TempDir) -> ConfigStore {
    ConfigStore::new()
        .with_storage_path(dir.path().join("config.toml"))
        .with_env_url(None)
        .with_discovery_config(fast_discovery())
}

// ── Resolver ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_resolver_finds_single_reachable_candidate() {
    let backend = healthy_backend().await;
    let http = reqwest::Client::new();

    // The reachable entry's position within the batch must not matter.
    for position in [0, 2, 4] {
        let mut candidates: Vec<String> = vec![
            dead_candidate(1),
            dead_candidate(2),
            dead_candidate(3),
            dead_candidate(4),
        ];
        candidates.insert(position, backend.uri());

        let found = resolve(&http, &candidates, &fast_discovery()).await;
        assert_eq!(found.as_deref(), Some(backend.uri().as_str()));
    }
}

#[tokio::test]
async fn test_resolver_prefers_input_order_when_multiple_reachable() {
    let first = healthy_backend().await;
    let second = healthy_backend().await;
    let http = reqwest::Client::new();

    let found = resolve(
        &http,
        &[first.uri(), second.uri()],
        &fast_discovery(),
    )
    .await;
    assert_eq!(found.as_deref(), Some(first.uri().as_str()));

    let found = resolve(
        &http,
        &[second.uri(), first.uri()],
        &fast_discovery(),
    )
    .await;
    assert_eq!(found.as_deref(), Some(second.uri().as_str()));
}

#[tokio::test]
async fn test_resolver_exhaustion_returns_none() {
    let http = reqwest::Client::new();
    let candidates: Vec<String> = (1..=4).map(dead_candidate).collect();

    let found = resolve(&http, &candidates, &fast_discovery()).await;
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_resolver_empty_candidate_list() {
    let http = reqwest::Client::new();
    let found = resolve(&http, &[], &fast_discovery()).await;
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_resolver_batches_sequentially() {
    let backend = healthy_backend().await;
    let http = reqwest::Client::new();

    // Reachable entry in the second batch: round one must settle (and the
    // inter-batch delay elapse) before it is found.
    let config = DiscoveryConfig {
        batch_size: 2,
        probe_timeout: Duration::from_millis(500),
        inter_batch_delay: Duration::from_millis(100),
    };
    let candidates = vec![dead_candidate(1), dead_candidate(2), backend.uri()];

    let found = resolve(&http, &candidates, &config).await;
    assert_eq!(found.as_deref(), Some(backend.uri().as_str()));
}

// ── ConfigStore discovery ───────────────────────────────────────────

#[tokio::test]
async fn test_discover_validates_persisted_url() {
    let backend = healthy_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let store = scratch_store(&dir);

    store.set_api_url(&backend.uri());
    store.clear_cache();

    let mut statuses = Vec::new();
    let outcome = store.discover(|s| statuses.push(s.to_owned())).await;

    assert!(outcome.is_confirmed());
    assert_eq!(outcome.url(), format!("{}/api", backend.uri()));
    assert!(
        statuses.iter().any(|s| s.starts_with("Validating saved URL")),
        "missing validation status: {statuses:?}"
    );
    // The winner is now cached for sync reads.
    assert_eq!(store.api_url(), outcome.url());
}

#[tokio::test]
async fn test_discover_clears_unreachable_persisted_url() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("config.toml");
    let store = ConfigStore::new()
        .with_storage_path(&storage)
        .with_env_url(None)
        .with_discovery_config(fast_discovery());

    store.set_api_url(&dead_candidate(1));
    store.clear_cache();
    assert!(storage.exists());

    let outcome = store.discover(|_| {}).await;

    // Bad entry is gone from storage, and discovery fell through to the
    // candidate sweep, which (with nothing listening) yields the fallback.
    assert!(!storage.exists());
    assert_eq!(outcome, Discovery::Unconfirmed(FALLBACK_URL.to_owned()));
}

#[tokio::test]
async fn test_discover_uses_environment_url() {
    let backend = healthy_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let store = scratch_store(&dir).with_env_url(Some(backend.uri()));

    let mut statuses = Vec::new();
    let outcome = store.discover(|s| statuses.push(s.to_owned())).await;

    assert_eq!(outcome, Discovery::Confirmed(backend.uri()));
    assert!(
        statuses
            .iter()
            .any(|s| s.starts_with("Using environment URL")),
        "missing env status: {statuses:?}"
    );
}

#[tokio::test]
async fn test_discover_revalidates_cached_url() {
    let backend = healthy_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let store = scratch_store(&dir);

    store.cache_url(backend.uri());

    let mut statuses = Vec::new();
    let outcome = store.discover(|s| statuses.push(s.to_owned())).await;

    assert_eq!(outcome, Discovery::Confirmed(backend.uri()));
    assert!(
        statuses.iter().any(|s| s.starts_with("Using cached URL")),
        "missing cached status: {statuses:?}"
    );
}

#[tokio::test]
async fn test_discover_drops_stale_cache_and_falls_through() {
    let backend = healthy_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let store = scratch_store(&dir).with_env_url(Some(backend.uri()));

    // Stale cache entry: fails revalidation, then env URL wins.
    store.cache_url(dead_candidate(1));

    let outcome = store.discover(|_| {}).await;

    assert_eq!(outcome, Discovery::Confirmed(backend.uri()));
    assert_eq!(store.api_url(), backend.uri());
}

#[tokio::test]
async fn test_exhausted_discovery_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let store = scratch_store(&dir);

    let outcome = store.discover(|_| {}).await;
    assert_eq!(outcome, Discovery::Unconfirmed(FALLBACK_URL.to_owned()));

    // A second pass retries from scratch instead of trusting the fallback:
    // the cached-URL fast path must not fire.
    let mut statuses = Vec::new();
    let _ = store.discover(|s| statuses.push(s.to_owned())).await;
    assert!(
        !statuses.iter().any(|s| s.starts_with("Using cached URL")),
        "fallback URL must not be cached: {statuses:?}"
    );
}
