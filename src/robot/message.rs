//! Notification content and webhook message bodies.

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

use super::NotifyError;

/// Kinds of message the robot can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    /// Plain text message
    #[default]
    Text,
}

impl MessageType {
    /// Returns the wire name used in the `msgtype` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
        }
    }
}

impl FromStr for MessageType {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else {
            Err(NotifyError::UnsupportedMessageType(s.to_string()))
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to a notification.
///
/// Serialized as `{code, message, line, file}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Application error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Line the error was raised at
    pub line: u32,
    /// File the error was raised in
    pub file: String,
}

impl ErrorDetail {
    /// Creates error details located at the caller.
    #[must_use]
    #[track_caller]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            code,
            message: message.into(),
            line: location.line(),
            file: location.file().to_string(),
        }
    }

    /// Creates error details from an error value, located at the caller.
    ///
    /// The message is the error's display text followed by its sources.
    #[must_use]
    #[track_caller]
    pub fn from_error(code: i64, error: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(code, message)
    }

    /// Overrides the recorded location.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }
}

/// What a notification reports: a description, its parameters and,
/// optionally, the error that prompted it.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContext {
    description: String,
    payload: Value,
    error: Option<ErrorDetail>,
}

impl NotificationContext {
    /// Creates a context with a `null` payload and no error.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            payload: Value::Null,
            error: None,
        }
    }

    /// Sets the parameters block.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Serializes `payload` into the parameters block.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if the value cannot be serialized.
    pub fn with_serialized<T: Serialize>(self, payload: &T) -> Result<Self, NotifyError> {
        Ok(self.with_payload(serde_json::to_value(payload)?))
    }

    /// Attaches error details.
    #[must_use]
    pub fn with_error(mut self, error: ErrorDetail) -> Self {
        self.error = Some(error);
        self
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the error details, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    /// Renders the message text.
    ///
    /// ```text
    /// <description>
    /// Parameters:
    /// <payload as pretty JSON>
    /// Debug:
    /// <error details as pretty JSON>
    /// ```
    ///
    /// The last two lines are only present when error details are attached.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if serialization fails.
    pub fn content(&self) -> Result<String, NotifyError> {
        let mut content = format!(
            "{}\nParameters:\n{}",
            self.description,
            serde_json::to_string_pretty(&self.payload)?
        );

        if let Some(error) = &self.error {
            content.push_str("\nDebug:\n");
            content.push_str(&serde_json::to_string_pretty(error)?);
        }

        Ok(content)
    }

    /// Builds the webhook body for `msg_type`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Encode`] if serialization fails.
    pub fn message(&self, msg_type: MessageType) -> Result<Value, NotifyError> {
        Ok(match msg_type {
            MessageType::Text => json!({
                "msgtype": msg_type.as_str(),
                "text": { "content": self.content()? },
            }),
        })
    }
}
