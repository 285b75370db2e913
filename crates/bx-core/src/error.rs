//! Typed error definitions for the BingX gateway.
//!
//! [`BxError`] is the single failure taxonomy of the REST client. The
//! variants separate construction problems, transport problems, and
//! provider-level rejections so that callers can decide whether a retry
//! without changing the request makes sense. All variants implement
//! `std::error::Error` via `thiserror`, so they compose with `anyhow::Result`
//! at the binary edge.

use thiserror::Error;

/// Message shown to end users for transport-level failures.
pub const UNREACHABLE_MESSAGE: &str = "exchange unreachable, try again later";

/// Domain-specific errors for the BingX gateway.
#[derive(Debug, Error)]
pub enum BxError {
    /// Bad or missing credentials, mode, or config value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected locally, before any request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network failure (DNS, connection refused, TLS) after retries ran out.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request deadline exceeded after retries ran out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// A successful HTTP status whose body is not valid JSON.
    #[error("malformed response (HTTP {status}): {body}")]
    MalformedResponse {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response text (truncated).
        body: String,
    },

    /// The provider accepted the request but answered with a non-zero code.
    #[error("api error {code}: {msg}")]
    Api {
        /// Provider error code, untouched.
        code: i64,
        /// Provider error message, untouched.
        msg: String,
    },

    /// Non-success HTTP status without a provider error envelope.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response text (truncated).
        body: String,
    },
}

impl BxError {
    /// Whether the failure may go away on its own (network or deadline).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Provider error code, if this is an [`BxError::Api`] rejection.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Text suitable for a CLI or GUI.
    ///
    /// Provider messages are shown verbatim; transport and timeout failures
    /// collapse to a generic "unreachable" line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { msg, .. } => msg.clone(),
            Self::Transport(_) | Self::Timeout(_) => UNREACHABLE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
