//! Backend URL discovery and persisted configuration for rollcall.
//!
//! Candidate generation, batched parallel probing, and the [`ConfigStore`]
//! that owns the cached / persisted / environment-derived base URL. The CLI
//! and any other frontend resolve their API base URL through this crate.

pub mod candidates;
pub mod resolver;
pub mod store;

pub use candidates::{API_SUFFIX, BACKEND_PORTS, candidate_urls};
pub use resolver::{DiscoveryConfig, resolve};
pub use store::{ConfigStore, Discovery, FALLBACK_URL};
