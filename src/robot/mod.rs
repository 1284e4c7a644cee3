//! Webhook notification robot.
//!
//! This module provides:
//! - The notifier bound to one webhook key ([`Robot`])
//! - A caller-owned robot cache ([`RobotRegistry`])
//! - Message content ([`NotificationContext`], [`ErrorDetail`], [`MessageType`])
//! - Error types ([`NotifyError`])
//!
//! # Wire Format
//!
//! Messages are posted to `<hook>/cgi-bin/webhook/send?key=<key>` as
//!
//! ```json
//! {"msgtype": "text", "text": {"content": "..."}}
//! ```

mod client;
mod error;
mod message;
mod registry;

#[cfg(test)]
mod message_tests;
#[cfg(test)]
mod registry_tests;

pub use client::Robot;
pub use error::NotifyError;
pub use message::{ErrorDetail, MessageType, NotificationContext};
pub use registry::RobotRegistry;
