//! Caller-owned cache of robots keyed by webhook key.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{ConfigError, defaults, normalize_base_uri};
use crate::middleware::{Executor, RetryMiddleware, RetryPolicy};

use super::Robot;

/// Hands out one shared [`Robot`] per webhook key.
///
/// Robots created by a registry share its hook host, retry policy and
/// transport. The registry is an ordinary value: share it behind an `Arc`
/// where several tasks need it.
///
/// ```
/// use hookline::robot::RobotRegistry;
/// use std::sync::Arc;
///
/// let registry = RobotRegistry::new();
/// let first = registry.get_or_create("key-a").unwrap();
/// let again = registry.get_or_create("key-a").unwrap();
///
/// assert!(Arc::ptr_eq(&first, &again));
/// assert!(registry.get_or_create("").is_err());
/// ```
#[derive(Debug)]
pub struct RobotRegistry {
    hook: String,
    retry: Option<RetryPolicy>,
    transport: Option<Executor>,
    robots: Mutex<HashMap<String, Arc<Robot>>>,
}

impl RobotRegistry {
    /// Creates a registry for the default hook host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hook: defaults::ROBOT_HOOK.to_string(),
            retry: None,
            transport: None,
            robots: Mutex::new(HashMap::new()),
        }
    }

    /// Uses `hook` as the host for robots created from now on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if `hook` has no host.
    pub fn with_hook(mut self, hook: &str) -> Result<Self, ConfigError> {
        self.hook = normalize_base_uri(hook)?;
        Ok(self)
    }

    /// Gives robots created from now on a retry policy.
    #[must_use]
    pub const fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Gives robots created from now on a shared transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Executor) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Returns the robot for `key`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRobotKey`] if `key` is empty.
    pub fn get_or_create(&self, key: &str) -> Result<Arc<Robot>, ConfigError> {
        let mut robots = self.robots.lock();
        if let Some(robot) = robots.get(key) {
            return Ok(Arc::clone(robot));
        }

        let mut robot = Robot::with_hook(key, &self.hook)?;
        if let Some(transport) = &self.transport {
            robot.set_transport(transport.clone());
        }
        if let Some(policy) = self.retry {
            robot.enable_retry_with(RetryMiddleware::new(policy));
        }

        tracing::debug!(hook = %self.hook, "Created robot");
        let robot = Arc::new(robot);
        robots.insert(key.to_string(), Arc::clone(&robot));
        Ok(robot)
    }

    /// Drops the robot cached for `key`.
    pub fn remove(&self, key: &str) -> Option<Arc<Robot>> {
        self.robots.lock().remove(key)
    }

    /// Returns the number of cached robots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.robots.lock().len()
    }

    /// Returns true if no robot has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.robots.lock().is_empty()
    }

    /// Returns the hook host used for new robots.
    #[must_use]
    pub fn hook(&self) -> &str {
        &self.hook
    }
}

impl Default for RobotRegistry {
    fn default() -> Self {
        Self::new()
    }
}
