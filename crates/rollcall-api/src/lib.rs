// rollcall-api: Async client and reachability probe for the rollcall backend

pub mod client;
pub mod error;
pub mod probe;
pub mod transport;

pub use client::{ApiClient, HealthStatus};
pub use error::Error;
pub use probe::{DEFAULT_PROBE_TIMEOUT, Reachability, probe};
pub use transport::TransportConfig;
