//! Connectivity probe: one bounded-time reachability check per candidate.
//!
//! The probe never fails: every error, non-2xx status, and timeout collapses
//! into [`Reachability::Unreachable`] so discovery logic stays free of error
//! handling. Only the response status matters; the body is ignored.

use std::time::Duration;

use tracing::trace;

/// Default timeout for ad-hoc reachability checks.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Outcome of a single probe.
///
/// A dedicated sum type rather than a bare `bool` because unreachable is a normal
/// outcome here, not an error, and call sites read better for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable)
    }
}

/// Probe `<base_url>/health` with a hard per-request deadline.
///
/// Returns [`Reachability::Reachable`] iff the response status is 2xx.
/// The request is aborted when `timeout` fires; the probe resolves within
/// roughly that bound, never hanging on a silent host.
pub async fn probe(http: &reqwest::Client, base_url: &str, timeout: Duration) -> Reachability {
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    match http.get(&url).timeout(timeout).send().await {
        Ok(resp) if resp.status().is_success() => {
            trace!(%url, "probe reachable");
            Reachability::Reachable
        }
        Ok(resp) => {
            trace!(%url, status = %resp.status(), "probe got non-success status");
            Reachability::Unreachable
        }
        Err(err) => {
            trace!(%url, %err, "probe failed");
            Reachability::Unreachable
        }
    }
}
