//! Configuration layer for hookline.
//!
//! This module provides:
//! - Per-client defaults and their resolution ([`ClientConfig`], [`TransportOptions`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Merged application settings ([`Settings`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Within a [`ClientConfig`], the `http_options` overlay is applied after the
//! typed fields and wins over them.
//!
//! # Retry Activation
//!
//! Retries stay disabled unless a retry value is given on the command line or
//! in the `[retry]` section. Missing halves fall back to the defaults
//! (3 retries, 1000 ms).

mod cli;
mod client;
pub mod defaults;
mod error;
mod settings;
mod toml;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod client_tests;

pub use cli::{Cli, Command};
pub use client::{ClientConfig, TransportOptions, normalize_base_uri};
pub use error::{ConfigError, field};
pub use settings::{RetrySettings, Settings, parse_pair, write_default_config};
pub use toml::{TomlConfig, default_config_template};
