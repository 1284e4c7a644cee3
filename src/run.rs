//! Command execution.
//!
//! Turns parsed commands and merged settings into dispatcher and robot
//! calls, and renders what they return.

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;

use hookline::config::{Command, ConfigError, Settings, field, parse_pair, write_default_config};
use hookline::dispatch::{Dispatcher, RequestError, RequestOptions, Unwrapped, Verb};
use hookline::middleware::{LoggingMiddleware, RetryPolicy};
use hookline::robot::{MessageType, NotificationContext, NotifyError, Robot, RobotRegistry};
use hookline::transport::HttpResponse;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Name the logging middleware is registered under.
const LOGGING_MIDDLEWARE_NAME: &str = "log";

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid command arguments or configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request failed.
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// The notification failed.
    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),

    /// The `--payload` argument is not valid JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

impl RunError {
    /// Returns true if the failure is the caller's configuration rather
    /// than the remote side.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::InvalidPayload(_)
                | Self::Request(RequestError::Config(_) | RequestError::UnsupportedMethod(_))
                | Self::Notify(NotifyError::Config(_) | NotifyError::UnsupportedMessageType(_))
        )
    }
}

/// Executes a command and returns the text to print.
///
/// # Errors
///
/// Returns [`RunError`] if the arguments are invalid or the request or
/// notification fails.
pub async fn execute(command: &Command, settings: &Settings) -> Result<String, RunError> {
    match command {
        Command::Init { output } => {
            write_default_config(output)?;
            Ok(format!("Configuration template written to: {}", output.display()))
        }
        Command::Request {
            verb,
            endpoint,
            query,
            headers,
            data,
            form,
            unwrap,
        } => {
            let verb: Verb = verb.parse()?;
            let options = request_options(query, headers, data.as_deref(), form)?;
            let dispatcher = build_dispatcher(settings);

            if *unwrap {
                let value = dispatcher.request_unwrap(verb, endpoint, options).await?;
                Ok(render_unwrapped(&value))
            } else {
                let response = dispatcher.request(verb, endpoint, options).await?;
                Ok(render_response(&response))
            }
        }
        Command::Notify {
            key,
            description,
            payload,
            msg_type,
        } => {
            let msg_type: MessageType = msg_type.parse()?;
            let payload = serde_json::from_str(payload).map_err(RunError::InvalidPayload)?;
            let robot = build_robot(settings, key.as_deref())?;

            let context = NotificationContext::new(description.as_str()).with_payload(payload);
            let reply = robot.notice(&context, msg_type).await?;
            Ok(render_unwrapped(&reply))
        }
    }
}

/// Creates a dispatcher from the merged settings.
///
/// Requests are logged by the outer middleware; retries, when enabled,
/// sit directly on the transport.
pub fn build_dispatcher(settings: &Settings) -> Dispatcher {
    let mut dispatcher = Dispatcher::new().with_config(settings.client.clone());
    dispatcher.push_middleware(LoggingMiddleware::new(), Some(LOGGING_MIDDLEWARE_NAME));

    if let Some(retry) = settings.retry {
        dispatcher.enable_retry(retry.max_retries, retry.interval_ms);
    }

    dispatcher
}

/// Creates the robot for `key`, falling back to the configured key.
///
/// # Errors
///
/// Returns [`ConfigError`] if no key is available or the hook is invalid.
pub fn build_robot(settings: &Settings, key: Option<&str>) -> Result<Arc<Robot>, ConfigError> {
    let key = key
        .or(settings.robot_key.as_deref())
        .ok_or_else(|| {
            ConfigError::missing(
                field::ROBOT_KEY,
                "Use --key or set 'key' in the [robot] section of the config file.",
            )
        })?;

    let mut registry = RobotRegistry::new().with_hook(&settings.robot_hook)?;
    if let Some(retry) = settings.retry {
        registry = registry.with_retry(RetryPolicy::new(retry.max_retries, retry.interval_ms));
    }

    registry.get_or_create(key)
}

/// Builds request options from `Key=Value` command-line arguments.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPair`] for an argument without a separator.
pub fn request_options(
    query: &[String],
    headers: &[String],
    data: Option<&str>,
    form: &[String],
) -> Result<RequestOptions, ConfigError> {
    let parse_all = |items: &[String]| -> Result<Vec<(String, String)>, ConfigError> {
        items.iter().map(|item| parse_pair(item)).collect()
    };

    let mut options = RequestOptions::new()
        .with_query_pairs(parse_all(query)?)
        .with_headers(parse_all(headers)?);

    if let Some(data) = data {
        options = options.with_body(data);
    } else if !form.is_empty() {
        options = options.with_form(parse_all(form)?);
    }

    Ok(options)
}

/// Renders a raw response: status line, headers, blank line, body.
pub fn render_response(response: &HttpResponse) -> String {
    let mut output = format!("HTTP {}\n", response.status);
    for (name, value) in &response.headers {
        let _ = writeln!(output, "{name}: {}", String::from_utf8_lossy(value.as_bytes()));
    }
    output.push('\n');
    output.push_str(&String::from_utf8_lossy(&response.body));
    output
}

/// Renders a decoded body: pretty JSON, the text as is, or a byte count
/// for binary bodies.
pub fn render_unwrapped(value: &Unwrapped) -> String {
    match value {
        Unwrapped::Json(json) => {
            serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
        }
        Unwrapped::Text(text) => text.clone(),
        Unwrapped::Bytes(bytes) => format!("<{} bytes of binary data>", bytes.len()),
    }
}
