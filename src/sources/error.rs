//! Error types for reading a live device

use std::fmt;

/// Result type alias for live device reads
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching a reading from a device
///
/// The polling loop treats every variant the same way; the distinction only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The device did not answer within the request timeout
    Timeout,

    /// The device answered with a non-success status code
    Http(u16),

    /// The response body was not a valid sensor report
    Parse(String),

    /// The request could not be sent (connection refused, DNS, ...)
    Request(String),

    /// Live mode without a device address
    NoAddress,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "device request timed out"),
            FetchError::Http(status) => write!(f, "device responded with HTTP {}", status),
            FetchError::Parse(msg) => write!(f, "malformed sensor report: {}", msg),
            FetchError::Request(msg) => write!(f, "device request failed: {}", msg),
            FetchError::NoAddress => write!(f, "no device address configured"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Http(status.as_u16())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
