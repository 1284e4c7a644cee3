//! Error types for request dispatching and response decoding.

use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::{HttpError, HttpResponse};

/// Error type for dispatcher operations.
///
/// Transport failures surface here only after the retry middleware (when
/// installed) has given up.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The exchange could not be completed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] DecodeError),

    /// The dispatcher configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The verb is not one of the supported HTTP methods.
    #[error("Unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),

    /// The endpoint cannot be turned into an absolute URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as given
        endpoint: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A per-request header has an invalid name or value.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as given
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The server answered with an error status and `http_errors` was set.
    #[error("Server responded with status {status}")]
    Status {
        /// Response status
        status: http::StatusCode,
        /// The full response
        response: Box<HttpResponse>,
    },
}

impl RequestError {
    /// Returns the response carried by a [`RequestError::Status`] error.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Status { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Error type for response unwrapping.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was announced as JSON but is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was announced as XML but is not well-formed.
    #[error("Invalid XML body: {0}")]
    Xml(String),
}
