//! Relay error definitions.

use thiserror::Error;

/// Errors that stop a relay call before a normalized envelope can be built.
///
/// A non-JSON upstream body is not an error; it becomes a status/reason envelope.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound body was not valid JSON or lacked a required field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Target URL could not be parsed or is not http(s).
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A caller-supplied value cannot be encoded as a header.
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// Outbound call exceeded the configured timeout.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// Outbound call could not complete (DNS, refused connection, reset).
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RelayError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidRequest(_) => "invalid_request",
            RelayError::InvalidUrl { .. } => "invalid_url",
            RelayError::InvalidHeader(_) => "invalid_header",
            RelayError::Timeout(_) => "timeout",
            RelayError::Transport(_) => "transport",
            RelayError::Client(_) => "client",
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
