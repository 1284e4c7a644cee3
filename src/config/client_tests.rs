//! Tests for `ClientConfig` and option resolution.

use super::client::{ClientConfig, normalize_base_uri};
use super::error::ConfigError;
use serde_json::{Map, Value, json};
use std::time::Duration;

fn overlay(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

mod base_uri {
    use super::*;

    #[test]
    fn strips_path_query_and_fragment() {
        let mut config = ClientConfig::new();
        config.set_base_uri("https://host:8443/path?x=1").unwrap();

        assert_eq!(config.base_uri(), "https://host:8443");
    }

    #[test]
    fn keeps_plain_host() {
        assert_eq!(
            normalize_base_uri("https://example.com/a/b#frag").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn missing_scheme_defaults_to_http() {
        assert_eq!(
            normalize_base_uri("example.com/path").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn default_port_is_dropped() {
        assert_eq!(
            normalize_base_uri("https://example.com:443/").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn ipv6_host_keeps_brackets() {
        assert_eq!(
            normalize_base_uri("http://[::1]:8080/x").unwrap(),
            "http://[::1]:8080"
        );
    }

    #[test]
    fn uri_without_host_is_rejected() {
        let err = normalize_base_uri("mailto:someone@example.com").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidBaseUri { .. }));
    }

    #[test]
    fn unset_base_uri_is_empty() {
        assert_eq!(ClientConfig::new().base_uri(), "");
    }
}

mod getters {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::new();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert!(config.http_options().is_empty());
    }

    #[test]
    fn setters_override_defaults() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_millis(1500))
            .with_connect_timeout(Duration::from_millis(500));

        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.connect_timeout(), Duration::from_millis(500));
    }
}

mod options {
    use super::*;

    #[test]
    fn merges_typed_fields() {
        let config = ClientConfig::new()
            .with_base_uri("https://api.example.com/v2")
            .unwrap()
            .with_timeout(Duration::from_secs(9));

        let options = config.options().unwrap();

        assert_eq!(options.base_uri, "https://api.example.com");
        assert_eq!(options.timeout, Duration::from_secs(9));
        assert_eq!(options.connect_timeout, Duration::from_secs(3));
        assert!(options.headers.is_empty());
        assert!(!options.debug);
    }

    #[test]
    fn overlay_wins_over_typed_fields() {
        let config = ClientConfig::new()
            .with_base_uri("https://first.example.com")
            .unwrap()
            .with_timeout(Duration::from_secs(9))
            .with_http_options(overlay(json!({
                "base_uri": "https://second.example.com/ignored",
                "timeout": 1.5,
                "connect_timeout": 0.25,
                "debug": true,
                "headers": {"User-Agent": "hookline"},
            })));

        let options = config.options().unwrap();

        assert_eq!(options.base_uri, "https://second.example.com");
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.connect_timeout, Duration::from_millis(250));
        assert!(options.debug);
        assert_eq!(options.headers.get("user-agent").unwrap(), "hookline");
    }

    #[test]
    fn unknown_keys_are_kept_in_extra() {
        let config =
            ClientConfig::new().with_http_options(overlay(json!({"proxy": "http://p:3128"})));

        let options = config.options().unwrap();

        assert_eq!(options.extra["proxy"], json!("http://p:3128"));
    }

    #[test]
    fn wrongly_typed_timeout_is_rejected() {
        let config = ClientConfig::new().with_http_options(overlay(json!({"timeout": "fast"})));

        let err = config.options().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidOption { ref key, .. } if key == "timeout"));
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let config = ClientConfig::new().with_http_options(overlay(json!({"timeout": -1.0})));

        assert!(config.options().is_err());
    }

    #[test]
    fn non_string_header_is_rejected() {
        let config =
            ClientConfig::new().with_http_options(overlay(json!({"headers": {"X-Count": 3}})));

        assert!(matches!(
            config.options().unwrap_err(),
            ConfigError::InvalidOption { .. }
        ));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let config =
            ClientConfig::new().with_http_options(overlay(json!({"headers": {"bad name": "x"}})));

        assert!(matches!(
            config.options().unwrap_err(),
            ConfigError::InvalidHeaderName { .. }
        ));
    }
}
