//! Upstream failure taxonomy.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the content API.
///
/// None of these ever reach a page renderer: the aggregation layer
/// recovers every variant into a field fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The exchange did not finish before its deadline and was cancelled.
    #[error("upstream timeout after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Connection refused, DNS failure, reset, etc.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Http { status: u16 },

    /// Body was not JSON, or the content type was not JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Body parsed but no known envelope yielded a usable value.
    #[error("no usable value in response for '{0}'")]
    NormalizationMiss(String),
}

impl FetchError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Network(_) => "network",
            FetchError::Http { .. } => "http",
            FetchError::MalformedResponse(_) => "malformed",
            FetchError::NormalizationMiss(_) => "normalization_miss",
        }
    }
}

impl FetchError {
    /// Classify a transport error from a client whose own timeout is `limit`.
    pub fn from_transport(e: reqwest::Error, limit: Duration) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(limit)
        } else {
            FetchError::from(e)
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Http { status: status.as_u16() }
        } else if e.is_decode() {
            FetchError::MalformedResponse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Result type for upstream operations.
pub type FetchResult<T> = Result<T, FetchError>;
