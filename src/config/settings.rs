//! Settings after merging CLI and TOML sources.
//!
//! All validation is performed during construction, so a [`Settings`]
//! value is always usable as-is.

use std::fmt;
use std::path::Path;

use super::cli::Cli;
use super::client::{ClientConfig, duration_from_secs};
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Retry parameters as configured, before the policy applies its floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Base interval in milliseconds
    pub interval_ms: u64,
}

/// Fully merged configuration ready for use by the application.
///
/// Priority: explicit CLI arguments, then the TOML file, then built-in
/// defaults.
#[derive(Debug)]
pub struct Settings {
    /// Dispatcher defaults
    pub client: ClientConfig,

    /// Retry parameters; `None` leaves retries disabled
    pub retry: Option<RetrySettings>,

    /// Robot webhook host
    pub robot_hook: String,

    /// Robot key from the config file, if any
    pub robot_key: Option<String>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base_uri = match self.client.base_uri() {
            "" => "none",
            uri => uri,
        };
        let retry = self.retry.map_or_else(
            || "off".to_string(),
            |r| format!("{}x/{}ms", r.max_retries, r.interval_ms),
        );

        write!(
            f,
            "Settings {{ base_uri: {base_uri}, timeout: {:.1}s, connect_timeout: {:.1}s, \
             retry: {retry}, robot_hook: {} }}",
            self.client.timeout().as_secs_f64(),
            self.client.connect_timeout().as_secs_f64(),
            self.robot_hook,
        )
    }
}

impl Settings {
    /// Creates settings from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URI or robot hook has no host
    /// - A timeout is negative or not finite
    /// - The options overlay is malformed
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let client = Self::build_client(cli, toml)?;
        let retry = Self::resolve_retry(cli, toml);

        let robot_hook = toml
            .and_then(|t| t.robot.hook.as_deref())
            .map_or_else(|| Ok(defaults::ROBOT_HOOK.to_string()), super::normalize_base_uri)?;

        let robot_key = toml
            .and_then(|t| t.robot.key.clone())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client,
            retry,
            robot_hook,
            robot_key,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn build_client(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ClientConfig, ConfigError> {
        let section = toml.map(|t| &t.client);
        let mut client = ClientConfig::new();

        if let Some(base_uri) = cli
            .base_uri
            .as_deref()
            .or_else(|| section.and_then(|s| s.base_uri.as_deref()))
        {
            client.set_base_uri(base_uri)?;
        }

        if let Some(secs) = cli.timeout.or_else(|| section.and_then(|s| s.timeout)) {
            client.set_timeout(duration_from_secs("timeout", secs)?);
        }

        if let Some(secs) = cli
            .connect_timeout
            .or_else(|| section.and_then(|s| s.connect_timeout))
        {
            client.set_connect_timeout(duration_from_secs("connect_timeout", secs)?);
        }

        if let Some(section) = section {
            client.set_http_options(section.options.clone());
        }

        // Surface overlay mistakes at startup rather than on first request
        client.options()?;

        Ok(client)
    }

    fn resolve_retry(cli: &Cli, toml: Option<&TomlConfig>) -> Option<RetrySettings> {
        let section = toml.map(|t| &t.retry);

        let max_retries = cli
            .retry_max
            .or_else(|| section.and_then(|s| s.max_retries));
        let interval_ms = cli
            .retry_interval
            .or_else(|| section.and_then(|s| s.interval_ms));

        if max_retries.is_none() && interval_ms.is_none() {
            return None;
        }

        Some(RetrySettings {
            max_retries: max_retries.unwrap_or(defaults::RETRY_MAX_RETRIES),
            interval_ms: interval_ms.unwrap_or(defaults::RETRY_INTERVAL_MILLIS),
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Splits a `Key=Value` or `Key: Value` string into trimmed parts.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPair`] if neither separator is present.
pub fn parse_pair(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidPair {
        value: s.to_string(),
    })
}
