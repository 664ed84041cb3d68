//! Batched parallel resolver: sweep the candidate list through the probe in
//! fixed-size rounds, returning the first reachable candidate.
//!
//! Each round fans out every probe in the batch concurrently and waits for
//! all of them to settle before selecting, so the winner is the first
//! reachable candidate *by input order*, not by completion time, and round
//! latency equals the slowest probe in the round. Rounds are strictly
//! sequential, capping worst-case latency at
//! `ceil(candidates / batch_size) × (probe_timeout + inter_batch_delay)`.

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use rollcall_api::probe;

/// Tunables for a discovery sweep.
///
/// The batch size is deliberately generous relative to realistic candidate
/// lists (under ~20 entries): it exists as a guard against fan-out storms if
/// the candidate builder ever grows, so typical sweeps run in a single round.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Probes launched concurrently per round.
    pub batch_size: usize,
    /// Per-probe deadline during sweeps (1500–2000 ms is the useful range).
    pub probe_timeout: Duration,
    /// Pause between rounds so the network can breathe.
    pub inter_batch_delay: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            probe_timeout: Duration::from_millis(2000),
            inter_batch_delay: Duration::from_millis(100),
        }
    }
}

/// Probe `candidates` in batches; return the first reachable one, or `None`
/// after exhausting every batch.
pub async fn resolve(
    http: &reqwest::Client,
    candidates: &[String],
    config: &DiscoveryConfig,
) -> Option<String> {
    let batch_size = config.batch_size.max(1);
    let rounds = candidates.len().div_ceil(batch_size);

    for (round, batch) in candidates.chunks(batch_size).enumerate() {
        debug!(round, size = batch.len(), "probing candidate batch");

        let outcomes = join_all(
            batch
                .iter()
                .map(|url| probe(http, url, config.probe_timeout)),
        )
        .await;

        // All probes have settled; pick by input order within the batch.
        for (url, outcome) in batch.iter().zip(outcomes) {
            if outcome.is_reachable() {
                debug!(%url, "candidate reachable");
                return Some(url.clone());
            }
        }

        if round + 1 < rounds {
            tokio::time::sleep(config.inter_batch_delay).await;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_count_is_ceil_of_batch_division() {
        let config = DiscoveryConfig::default();
        assert_eq!(0usize.div_ceil(config.batch_size), 0);
        assert_eq!(1usize.div_ceil(config.batch_size), 1);
        assert_eq!(50usize.div_ceil(config.batch_size), 1);
        assert_eq!(51usize.div_ceil(config.batch_size), 2);
        assert_eq!(150usize.div_ceil(config.batch_size), 3);
    }
}
