//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default total request timeout in seconds.
pub const TIMEOUT_SECS: f64 = 5.0;

/// Default connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: f64 = 3.0;

/// Default number of retries after the initial attempt.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default base retry interval in milliseconds.
pub const RETRY_INTERVAL_MILLIS: u64 = 1000;

/// Smallest number of retries a retry policy allows.
pub const RETRY_MIN_RETRIES: u32 = 1;

/// Interval used when a non-positive retry interval is supplied.
pub const RETRY_FLOOR_INTERVAL_MILLIS: u64 = 1000;

/// Default robot webhook host.
pub const ROBOT_HOOK: &str = "https://qyapi.weixin.qq.com";

/// Path the robot posts messages to, relative to the hook host.
pub const ROBOT_SEND_PATH: &str = "/cgi-bin/webhook/send";

/// Default configuration file name for `init`.
pub const CONFIG_FILE_NAME: &str = "hookline.toml";

/// Default total request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(5)
}

/// Default connect timeout as Duration.
#[must_use]
pub const fn connect_timeout() -> Duration {
    Duration::from_secs(3)
}
