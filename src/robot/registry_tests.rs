//! Tests for `RobotRegistry`.

use super::{MessageType, NotificationContext, RobotRegistry};
use crate::config::ConfigError;
use crate::middleware::{Executor, RetryPolicy};
use crate::test_fixtures::MockClient;
use std::sync::Arc;

#[test]
fn same_key_returns_same_robot() {
    let registry = RobotRegistry::new();

    let a = registry.get_or_create("a").unwrap();
    let a_again = registry.get_or_create("a").unwrap();
    let b = registry.get_or_create("b").unwrap();

    assert!(Arc::ptr_eq(&a, &a_again));
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(registry.len(), 2);
}

#[test]
fn empty_key_is_a_config_error() {
    let registry = RobotRegistry::new();

    assert!(matches!(
        registry.get_or_create(""),
        Err(ConfigError::EmptyRobotKey)
    ));
    assert!(registry.is_empty());
}

#[test]
fn remove_forgets_the_robot() {
    let registry = RobotRegistry::new();
    let first = registry.get_or_create("a").unwrap();

    assert!(registry.remove("a").is_some());
    let second = registry.get_or_create("a").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn hook_applies_to_new_robots() {
    let registry = RobotRegistry::new().with_hook("http://127.0.0.1:9000/x").unwrap();

    let robot = registry.get_or_create("k").unwrap();

    assert_eq!(registry.hook(), "http://127.0.0.1:9000");
    assert_eq!(robot.hook(), "http://127.0.0.1:9000");
}

#[test]
fn invalid_hook_is_rejected() {
    assert!(matches!(
        RobotRegistry::new().with_hook("http://"),
        Err(ConfigError::InvalidBaseUri { .. })
    ));
}

#[test]
fn retry_policy_is_installed() {
    let registry = RobotRegistry::new().with_retry(RetryPolicy::new(2, 10));

    let robot = registry.get_or_create("k").unwrap();

    assert!(robot.dispatcher().retry_enabled());
}

#[tokio::test]
async fn shared_transport_is_used() {
    let client = Arc::new(MockClient::success());
    let registry = RobotRegistry::new().with_transport(Executor::from_client(Arc::clone(&client)));

    for key in ["one", "two"] {
        registry
            .get_or_create(key)
            .unwrap()
            .notice(&NotificationContext::new(key), MessageType::Text)
            .await
            .unwrap();
    }

    assert_eq!(client.calls(), 2);
    assert!(client.last_request().url.as_str().ends_with("key=two"));
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = Arc::new(RobotRegistry::new());

    let robots: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| registry.get_or_create("shared").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(robots.iter().all(|r| Arc::ptr_eq(r, &robots[0])));
    assert_eq!(registry.len(), 1);
}
