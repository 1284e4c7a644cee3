//! Error types for robot notifications.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dispatch::RequestError;

/// Error type for robot operations.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sending the message failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The robot is misconfigured (empty key, invalid hook).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The message could not be serialized.
    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),

    /// The message type has no formatter.
    #[error("Unsupported message type '{0}'")]
    UnsupportedMessageType(String),

    /// The webhook answered with a non-zero `errcode`.
    #[error("Robot rejected the message (errcode {code}): {message}")]
    Rejected {
        /// The service's error code
        code: i64,
        /// The service's error message
        message: String,
    },
}
