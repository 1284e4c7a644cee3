//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
/// Configuration errors are fatal: they are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The base URI cannot be reduced to `scheme://host[:port]`.
    #[error("Invalid base URI '{url}': {reason}")]
    InvalidBaseUri {
        /// The invalid URI string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A transport option overlay entry has the wrong shape.
    #[error("Invalid option '{key}': {reason}")]
    InvalidOption {
        /// Option key
        key: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid duration value (negative, not finite, or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid `Key=Value` pair on the command line.
    #[error("Invalid pair '{value}': expected 'Key=Value' or 'Key: Value'")]
    InvalidPair {
        /// The invalid string
        value: String,
    },

    /// Invalid header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A robot was requested with an empty key.
    #[error("Robot key must not be empty")]
    EmptyRobotKey,

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },
}

/// Well-known field names for `MissingRequired` errors.
pub mod field {
    /// The robot key field.
    pub const ROBOT_KEY: &str = "robot.key";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
