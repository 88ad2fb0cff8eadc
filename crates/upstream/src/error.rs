//! Typed error enum for upstream fetches.

use thiserror::Error;

/// Errors from a single provider call. No variant is retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("upstream unreachable: {0}")]
    Network(String),
    #[error("upstream returned an unparseable payload: {0}")]
    InvalidPayload(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl UpstreamError {
    /// Whether the provider could not be reached or answered with garbage,
    /// as opposed to answering with an explicit error status.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_) | Self::InvalidPayload(_))
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Network(err.to_string()) }
    }
}
