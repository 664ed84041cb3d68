use thiserror::Error;

/// Top-level error type for the `rollcall-api` crate.
///
/// Covers transport failures, timeouts, and server-reported errors.
/// The probe never produces these; it reduces every failure to
/// [`Reachability::Unreachable`](crate::Reachability); only the
/// [`ApiClient`](crate::ApiClient) surfaces them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out. Kept distinct from other transport errors so
    /// callers can suggest retry-with-patience rather than retry-immediately.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server ──────────────────────────────────────────────────────
    /// Non-2xx response. The message is the server-supplied error text when
    /// the body parses as `{"error": "..."}`, or `HTTP error <status>`
    /// otherwise. Displayed verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// A timeout error carrying the deadline that fired.
    pub fn timeout(timeout: std::time::Duration) -> Self {
        Self::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    }

    /// Returns `true` if this error is the request-timeout variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
