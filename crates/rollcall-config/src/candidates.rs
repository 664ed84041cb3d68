//! Candidate base-URL generation: a finite, ordered, duplicate-free list of
//! plausible backend addresses. Pure construction, no network I/O.

use std::net::Ipv4Addr;

use indexmap::IndexSet;

/// Ports the backend is known to bind.
pub const BACKEND_PORTS: [u16; 3] = [5001, 5005, 5010];

/// Fixed API path segment every base URL ends with.
pub const API_SUFFIX: &str = "/api";

/// Build the ordered candidate list for a discovery sweep.
///
/// Loopback addresses crossed with the known ports come first; if a host
/// context is available (and is not itself loopback) it is crossed with the
/// same ports, which enables reaching a backend from another device on the
/// LAN. Without host context only the loopback candidates are produced.
///
/// Deduplication is by exact string; insertion order is preserved for the
/// resolver's stable within-batch selection.
pub fn candidate_urls(host: Option<&str>) -> Vec<String> {
    let mut urls: IndexSet<String> = IndexSet::new();

    let mut add = |candidate: String| {
        urls.insert(candidate.trim_end_matches('/').to_owned());
    };

    for port in BACKEND_PORTS {
        add(format!("http://localhost:{port}{API_SUFFIX}"));
        add(format!("http://127.0.0.1:{port}{API_SUFFIX}"));
    }

    if let Some(host) = host {
        if host != "localhost" && host != "127.0.0.1" {
            for port in BACKEND_PORTS {
                add(format!("http://{host}:{port}{API_SUFFIX}"));
            }
        }

        // Re-adding a private LAN host is a no-op under set semantics (the
        // entries above already cover it). Retained as the hook for ranking
        // the current LAN host ahead of the generic candidates.
        if is_private_ipv4(host) {
            for port in BACKEND_PORTS {
                add(format!("http://{host}:{port}{API_SUFFIX}"));
            }
        }
    }

    urls.into_iter().collect()
}

/// `true` for hosts in 10/8, 172.16/12, or 192.168/16.
fn is_private_ipv4(host: &str) -> bool {
    host.parse::<Ipv4Addr>().is_ok_and(|ip| ip.is_private())
}
