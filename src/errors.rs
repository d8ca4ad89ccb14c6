//! Error taxonomy for relay orchestration
//!
//! Every network and data-shape failure is surfaced to the immediate caller;
//! nothing is suppressed or defaulted away. The only implicit retry in the
//! crate is the status-polling loop, which retries until terminal-or-timeout.
//!
//! Note that an unrecognized status response shape is *not* an error: the
//! tracker classifies it as `Unknown` and keeps polling. A
//! `ConfirmationTimeout` means "inclusion undetermined", not "failed".

use std::time::Duration;
use thiserror::Error;

/// Error type covering the full submission lifecycle: tip market reads,
/// fee derivation inputs, bundle simulation, relay submission, and
/// status tracking.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Non-2xx HTTP response from the tip-floor endpoint, the relay, or
    /// the simulation RPC
    #[error("transport error: HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// Connection-level HTTP failure (DNS, TLS, timeout, ...)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not parse as the expected JSON shape
    #[error("json decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tip-floor endpoint answered successfully but with zero samples
    #[error("tip floor returned no samples")]
    EmptyTipData,

    /// A required parameter is missing or invalid
    ///
    /// Notably the simulation endpoint, which deliberately has no default:
    /// `simulateBundle` is a capability not every RPC provider supports.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Defensive bundle validation failed (empty, over the 5-transaction
    /// relay ceiling, or mixed encodings)
    #[error("invalid bundle: {0}")]
    InvalidBundle(String),

    /// The relay accepted the HTTP request but returned a JSON-RPC error
    /// object instead of a result
    #[error("relay rejected submission (code {code}): {message}")]
    Submission { code: i64, message: String },

    /// Status polling exceeded the caller's budget without reaching a
    /// terminal state. Inclusion is undetermined, not failed.
    #[error("bundle {bundle_id} not terminal after {elapsed:?}")]
    ConfirmationTimeout { bundle_id: String, elapsed: Duration },

    /// Status polling was aborted through the caller's cancellation token
    #[error("status polling for bundle {bundle_id} cancelled")]
    Cancelled { bundle_id: String },
}

impl RelayError {
    /// Whether retrying the operation might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http(_) => true,
            Self::EmptyTipData => true,
            // Undetermined, the bundle may still land; polling again is valid
            Self::ConfirmationTimeout { .. } => true,

            Self::Json(_) => false,
            Self::Configuration(_) => false,
            Self::InvalidBundle(_) => false,
            Self::Submission { .. } => false,
            Self::Cancelled { .. } => false,
        }
    }

    /// Error category for logging and metrics labels
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Http(_) => "http",
            Self::Json(_) => "json",
            Self::EmptyTipData => "tip_data",
            Self::Configuration(_) => "config",
            Self::InvalidBundle(_) => "validation",
            Self::Submission { .. } => "submission",
            Self::ConfirmationTimeout { .. } => "timeout",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Create an invalid-bundle error
    pub fn invalid_bundle(reason: impl Into<String>) -> Self {
        Self::InvalidBundle(reason.into())
    }
}
