//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hookline: HTTP requests with middleware and retries
///
/// Sends one-off HTTP requests through the retrying client and posts
/// notifications to a webhook robot.
#[derive(Debug, Parser)]
#[command(name = "hookline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Base URI relative endpoints resolve against
    #[arg(long = "base-uri", global = true)]
    pub base_uri: Option<String>,

    /// Total request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Connect timeout in seconds
    #[arg(long = "connect-timeout", global = true)]
    pub connect_timeout: Option<f64>,

    /// Number of retries after the initial attempt
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Base retry interval in milliseconds
    #[arg(long = "retry-interval", global = true)]
    pub retry_interval: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for hookline
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "hookline.toml")]
        output: PathBuf,
    },

    /// Send a single HTTP request and print the response
    Request {
        /// HTTP verb (case-insensitive)
        verb: String,

        /// Endpoint, absolute or relative to the base URI
        endpoint: String,

        /// Query parameter in 'Key=Value' format (can be specified multiple times)
        #[arg(long = "query", short = 'q', value_name = "K=V")]
        query: Vec<String>,

        /// Header in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
        #[arg(long = "header", short = 'H', value_name = "K=V")]
        headers: Vec<String>,

        /// Raw request body
        #[arg(long, short, conflicts_with = "form")]
        data: Option<String>,

        /// Form field in 'Key=Value' format (can be specified multiple times)
        #[arg(long = "form", short = 'f', value_name = "K=V")]
        form: Vec<String>,

        /// Decode the response by content type before printing
        #[arg(long)]
        unwrap: bool,
    },

    /// Post a notification through the webhook robot
    Notify {
        /// Robot key (falls back to robot.key in the config file)
        #[arg(long)]
        key: Option<String>,

        /// Human readable description heading the message
        #[arg(long, short)]
        description: String,

        /// JSON payload attached to the message
        #[arg(long, short, default_value = "null")]
        payload: String,

        /// Message type
        #[arg(long = "msg-type", default_value = "text")]
        msg_type: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
