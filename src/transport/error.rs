//! Error type for a single physical HTTP attempt.

use thiserror::Error;

/// Fault raised by an [`HttpClient`](super::HttpClient) before any response
/// status was seen.
///
/// The transport converts these into [`crate::Error`] values; callers of the
/// high-level client never see an `HttpError` directly.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS failures and bodies cut off mid-stream.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The attempt exceeded its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (bad URL, bad header).
    ///
    /// This is a configuration error rather than a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
