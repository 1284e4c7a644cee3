//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport operations.
///
/// Describes why an exchange could not be completed. A response with an
/// error status is *not* an `HttpError`; it is returned as an ordinary
/// [`HttpResponse`](super::HttpResponse) and left to the retry policy
/// and the caller.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and failures while reading the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    /// Returns true if the exchange failed at the connection level.
    ///
    /// Connection failures and timeouts qualify. Invalid URLs and client
    /// construction failures do not: re-sending cannot fix them.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}
