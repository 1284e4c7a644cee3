//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use hookline::config::{ConfigError, field};
use hookline::dispatch::RequestError;
use hookline::robot::NotifyError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing robot key, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - connection failure, rejected notification, etc.
    ///
    /// A function because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Returns a follow-up hint for configuration errors the user can fix.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::ROBOT_KEY => {
            Some("Pass --key, or run 'hookline init' and fill in [robot] key.")
        }
        ConfigError::EmptyRobotKey => {
            Some("The robot key is the 'key' query parameter of the webhook URL.")
        }
        ConfigError::InvalidBaseUri { .. } => Some(
            "Base URIs look like 'https://api.example.com' or 'https://host:8443'; \
             only scheme, host and port are kept.",
        ),
        ConfigError::InvalidOption { .. } => Some(
            "[client.options] accepts base_uri, timeout, connect_timeout, headers, debug, \
             query, json, form_params, body and http_errors.",
        ),
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            Some("Run 'hookline init' to generate a configuration template.")
        }
        _ => None,
    }
}

/// Returns a follow-up hint for a failed command.
pub fn run_hint(error: &RunError) -> Option<&'static str> {
    match error {
        RunError::Config(e)
        | RunError::Request(RequestError::Config(e))
        | RunError::Notify(NotifyError::Config(e)) => config_hint(e),
        RunError::Request(RequestError::InvalidEndpoint { .. }) => Some(
            "Relative endpoints need a base URI: pass --base-uri or set [client] base_uri.",
        ),
        RunError::Request(RequestError::UnsupportedMethod(_)) => {
            Some("Supported verbs: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS.")
        }
        RunError::Notify(NotifyError::Rejected { .. }) => Some(
            "The webhook refused the message; check the robot key and [robot] hook.",
        ),
        RunError::InvalidPayload(_) => {
            Some("--payload takes a JSON document, e.g. '{\"env\":\"prod\"}'.")
        }
        _ => None,
    }
}

/// Prints the hint for a configuration error, if there is one.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Prints the hint for a failed command, if there is one.
pub fn print_run_hint(error: &RunError) {
    if let Some(hint) = run_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookline::transport::HttpError;

    #[test]
    fn missing_robot_key_points_at_flag_and_config() {
        let error = ConfigError::missing(field::ROBOT_KEY, "");

        assert!(config_hint(&error).unwrap().contains("--key"));
    }

    #[test]
    fn invalid_base_uri_shows_the_expected_shape() {
        let error = ConfigError::InvalidBaseUri {
            url: "http://".to_string(),
            reason: "missing host".to_string(),
        };

        assert!(config_hint(&error).unwrap().contains("scheme, host and port"));
    }

    #[test]
    fn relative_endpoint_without_base_mentions_base_uri() {
        let error = RunError::Request(RequestError::InvalidEndpoint {
            endpoint: "/status".to_string(),
            reason: "relative endpoint and no base URI".to_string(),
        });

        assert!(run_hint(&error).unwrap().contains("--base-uri"));
    }

    #[test]
    fn nested_config_errors_reuse_config_hints() {
        let error = RunError::Notify(NotifyError::Config(ConfigError::EmptyRobotKey));

        assert_eq!(run_hint(&error), config_hint(&ConfigError::EmptyRobotKey));
    }

    #[test]
    fn rejected_notification_mentions_the_robot() {
        let error = RunError::Notify(NotifyError::Rejected {
            code: 93000,
            message: "invalid webhook url".to_string(),
        });

        assert!(run_hint(&error).unwrap().contains("robot key"));
    }

    #[test]
    fn transport_failures_have_no_hint() {
        let error = RunError::Request(RequestError::Http(HttpError::Timeout));

        assert_eq!(run_hint(&error), None);
    }
}
