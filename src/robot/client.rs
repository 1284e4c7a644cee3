//! The robot: a webhook notifier built on a dispatcher.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{ConfigError, defaults};
use crate::dispatch::{Dispatcher, RequestError, RequestOptions, Unwrapped, Verb, unwrap_response};
use crate::middleware::{Executor, Middleware};
use crate::transport::HttpClient;

use super::{MessageType, NotificationContext, NotifyError};

/// Posts notifications to a group-chat webhook.
///
/// Each robot is bound to one webhook key and sends through its own
/// [`Dispatcher`], whose base URI is the hook host.
///
/// # Example
///
/// ```no_run
/// use hookline::robot::{MessageType, NotificationContext, Robot};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let robot = Robot::new("my-webhook-key")?.with_retry(2, 500);
///
/// let context = NotificationContext::new("Nightly import failed")
///     .with_payload(json!({"batch": 42}));
/// robot.notice(&context, MessageType::Text).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Robot {
    key: String,
    dispatcher: Dispatcher,
}

impl Robot {
    /// Creates a robot posting to the default hook host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRobotKey`] if `key` is empty.
    pub fn new(key: &str) -> Result<Self, ConfigError> {
        Self::with_hook(key, defaults::ROBOT_HOOK)
    }

    /// Creates a robot posting to `hook`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRobotKey`] if `key` is empty, or
    /// [`ConfigError::InvalidBaseUri`] if `hook` has no host.
    pub fn with_hook(key: &str, hook: &str) -> Result<Self, ConfigError> {
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyRobotKey);
        }

        let mut dispatcher = Dispatcher::new();
        dispatcher.set_base_uri(hook)?;

        Ok(Self {
            key: key.to_string(),
            dispatcher,
        })
    }

    /// Sends through `client` instead of the default transport.
    #[must_use]
    pub fn with_transport<H>(mut self, client: H) -> Self
    where
        H: HttpClient + 'static,
    {
        self.dispatcher = self.dispatcher.with_transport(client);
        self
    }

    /// Sends through a shared client.
    #[must_use]
    pub fn with_shared_transport<H>(mut self, client: Arc<H>) -> Self
    where
        H: HttpClient + 'static,
    {
        self.dispatcher = self.dispatcher.with_shared_transport(client);
        self
    }

    /// Replaces the terminal executor.
    pub fn set_transport(&mut self, transport: Executor) -> &mut Self {
        self.dispatcher.set_transport(transport);
        self
    }

    /// Retries failed posts with linear backoff.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, interval_millis: u64) -> Self {
        self.dispatcher.enable_retry(max_retries, interval_millis);
        self
    }

    /// Installs a custom retry middleware.
    pub fn enable_retry_with<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.dispatcher.enable_retry_with(middleware);
        self
    }

    /// Returns the webhook key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the normalized hook host.
    #[must_use]
    pub fn hook(&self) -> &str {
        self.dispatcher.config().base_uri()
    }

    /// Returns the underlying dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Sends a notification.
    ///
    /// The message is posted as JSON to the send path with the key as the
    /// `key` query parameter. The decoded reply is returned.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the message cannot be encoded, the post
    /// fails or ends with an error status, or the reply carries a
    /// non-zero `errcode`.
    pub async fn notice(
        &self,
        context: &NotificationContext,
        msg_type: MessageType,
    ) -> Result<Unwrapped, NotifyError> {
        let body = context.message(msg_type)?;
        let options = RequestOptions::new()
            .with_header("Accept", "application/json")
            .with_query("key", self.key.as_str())
            .with_json(body)
            .with_http_errors(true)
            .with_debug(true);

        tracing::debug!(%msg_type, description = context.description(), "Sending robot notification");

        let response = self
            .dispatcher
            .request(Verb::Post, defaults::ROBOT_SEND_PATH, options)
            .await?;
        let reply = unwrap_response(&response).map_err(RequestError::from)?;

        if let Some((code, message)) = rejection(&reply) {
            tracing::warn!(code, %message, "Robot notification rejected");
            return Err(NotifyError::Rejected { code, message });
        }

        tracing::info!(%msg_type, "Robot notification delivered");
        Ok(reply)
    }
}

/// Extracts a non-zero `errcode` and its `errmsg` from a JSON reply.
fn rejection(reply: &Unwrapped) -> Option<(i64, String)> {
    let object = reply.as_json()?.as_object()?;
    let code = object.get("errcode").and_then(Value::as_i64)?;
    if code == 0 {
        return None;
    }

    let message = object
        .get("errmsg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}
