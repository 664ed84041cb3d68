//! CLI error types with miette diagnostics.
//!
//! Maps `rollcall_api::Error` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(rollcall::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Try: rollcall discover"
        )
    )]
    ConnectionFailed { message: String },

    #[error("No reachable backend found")]
    #[diagnostic(
        code(rollcall::discovery_failed),
        help(
            "Set the URL manually: rollcall config set-url <url>\n\
             Unconfirmed fallback: {fallback}"
        )
    )]
    DiscoveryFailed { fallback: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(rollcall::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error (HTTP {status}): {message}")]
    #[diagnostic(code(rollcall::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rollcall::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(rollcall::json), help("Check the JSON argument and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::DiscoveryFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── rollcall_api::Error → CliError mapping ───────────────────────────

impl From<rollcall_api::Error> for CliError {
    fn from(err: rollcall_api::Error) -> Self {
        match err {
            rollcall_api::Error::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            rollcall_api::Error::Api { status, message } => Self::ApiError { status, message },

            rollcall_api::Error::InvalidUrl(e) => Self::Validation {
                field: "api-url".into(),
                reason: e.to_string(),
            },

            rollcall_api::Error::Transport(e) => Self::ConnectionFailed {
                message: e.to_string(),
            },

            rollcall_api::Error::Deserialization { message, .. } => Self::ConnectionFailed {
                message: format!("unexpected response body: {message}"),
            },
        }
    }
}
