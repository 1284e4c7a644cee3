//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP client defaults
    #[serde(default)]
    pub client: ClientSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Notification robot configuration
    #[serde(default)]
    pub robot: RobotSection,
}

/// HTTP client section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base URI relative endpoints resolve against
    pub base_uri: Option<String>,

    /// Total request timeout in seconds
    pub timeout: Option<f64>,

    /// Connect timeout in seconds
    pub connect_timeout: Option<f64>,

    /// Extra transport options overlay (`headers`, `debug`, ...)
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Number of retries after the initial attempt
    pub max_retries: Option<u32>,

    /// Base interval in milliseconds; the n-th retry waits n times this
    pub interval_ms: Option<u64>,
}

/// Notification robot section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotSection {
    /// Webhook host the robot posts to
    pub hook: Option<String>,

    /// Robot key sent as the `key` query parameter
    pub key: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# hookline configuration file

[client]
# Base URI for relative endpoints; path and query are discarded
# base_uri = "https://api.example.com"

# Total request timeout in seconds (default: 5.0)
timeout = 5.0

# Connect timeout in seconds (default: 3.0)
connect_timeout = 3.0

# Extra transport options, applied last
# [client.options]
# debug = true
# [client.options.headers]
# User-Agent = "hookline"

[retry]
# Retries after the initial attempt (default: 3, minimum: 1)
# max_retries = 3

# Base interval in milliseconds; the n-th retry waits n * interval (default: 1000)
# interval_ms = 1000

[robot]
# Webhook host (default: https://qyapi.weixin.qq.com)
# hook = "https://qyapi.weixin.qq.com"

# Robot key
# key = "your-robot-key"
"#
    .to_string()
}
