//! Per-client configuration and its resolution into transport options.

use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde_json::{Map, Value};

use super::defaults;
use super::error::ConfigError;

/// Instance-level defaults shared by every request of a dispatcher.
///
/// Unset fields fall back to [`defaults`] when read. The `http_options`
/// overlay is applied last by [`ClientConfig::options`] and may override
/// any of the typed fields.
///
/// # Example
///
/// ```
/// use hookline::config::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_base_uri("https://api.example.com:8443/v1?debug=1")
///     .unwrap();
///
/// assert_eq!(config.base_uri(), "https://api.example.com:8443");
/// assert_eq!(config.timeout().as_secs(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    base_uri: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_options: Map<String, Value>,
}

/// Fully resolved options used to build the transport and resolve endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportOptions {
    /// Normalized base URI, empty when none is configured
    pub base_uri: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Headers sent with every request
    pub headers: HeaderMap,
    /// Log every exchange at debug level
    pub debug: bool,
    /// Overlay entries with no typed counterpart, kept verbatim
    pub extra: Map<String, Value>,
}

impl ClientConfig {
    /// Creates an empty configuration; every getter returns its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URI, keeping only `scheme://host[:port]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the URI has no host.
    pub fn with_base_uri(mut self, url: &str) -> Result<Self, ConfigError> {
        self.set_base_uri(url)?;
        Ok(self)
    }

    /// Sets the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Replaces the extra transport options overlay.
    #[must_use]
    pub fn with_http_options(mut self, options: Map<String, Value>) -> Self {
        self.http_options = options;
        self
    }

    /// Sets the base URI in place, keeping only `scheme://host[:port]`.
    ///
    /// Path, query and fragment are discarded. A URI without a scheme is
    /// read as `http`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the URI has no host.
    pub fn set_base_uri(&mut self, url: &str) -> Result<&mut Self, ConfigError> {
        self.base_uri = Some(normalize_base_uri(url)?);
        Ok(self)
    }

    /// Sets the total request timeout in place.
    pub const fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout in place.
    pub const fn set_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Replaces the extra transport options overlay in place.
    pub fn set_http_options(&mut self, options: Map<String, Value>) -> &mut Self {
        self.http_options = options;
        self
    }

    /// Returns the normalized base URI, or an empty string when unset.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        self.base_uri.as_deref().unwrap_or_default()
    }

    /// Returns the total request timeout (default 5 seconds).
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(defaults::timeout)
    }

    /// Returns the connect timeout (default 3 seconds).
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout.unwrap_or_else(defaults::connect_timeout)
    }

    /// Returns the extra transport options overlay.
    #[must_use]
    pub const fn http_options(&self) -> &Map<String, Value> {
        &self.http_options
    }

    /// Returns the extra transport options overlay for editing.
    pub const fn http_options_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.http_options
    }

    /// Merges the typed fields with the `http_options` overlay.
    ///
    /// Starts from `{base_uri, timeout, connect_timeout}` and lets the
    /// overlay override them. Recognized overlay keys are `base_uri`,
    /// `timeout` and `connect_timeout` (seconds), `headers` (object of
    /// strings) and `debug` (bool); other keys end up in
    /// [`TransportOptions::extra`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a recognized overlay key has the wrong type
    /// or an invalid value.
    pub fn options(&self) -> Result<TransportOptions, ConfigError> {
        let mut options = TransportOptions {
            base_uri: self.base_uri().to_string(),
            timeout: self.timeout(),
            connect_timeout: self.connect_timeout(),
            headers: HeaderMap::new(),
            debug: false,
            extra: Map::new(),
        };

        for (key, value) in &self.http_options {
            match key.as_str() {
                "base_uri" => {
                    let url = value
                        .as_str()
                        .ok_or_else(|| invalid_option(key, "expected a string"))?;
                    options.base_uri = normalize_base_uri(url)?;
                }
                "timeout" => options.timeout = seconds_option(key, value)?,
                "connect_timeout" => options.connect_timeout = seconds_option(key, value)?,
                "headers" => options.headers = headers_option(key, value)?,
                "debug" => {
                    options.debug = value
                        .as_bool()
                        .ok_or_else(|| invalid_option(key, "expected a boolean"))?;
                }
                _ => {
                    options.extra.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(options)
    }
}

/// Reduces a URL to `scheme://host[:port]`.
///
/// Default ports are dropped by the URL parser, so `https://host:443`
/// normalizes to `https://host`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUri`] if the string cannot be parsed
/// or has no host.
pub fn normalize_base_uri(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUri {
        url: url.to_string(),
        reason,
    };

    let parsed = match url::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("http://{url}")).map_err(|e| invalid(e.to_string()))?
        }
        Err(e) => return Err(invalid(e.to_string())),
    };

    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid("missing host".to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

/// Parses a header name, reporting failures as configuration errors.
fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a header value, reporting failures as configuration errors.
fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Converts seconds to a `Duration`, rejecting negative and non-finite values.
pub(crate) fn duration_from_secs(field: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidDuration {
        field,
        reason: e.to_string(),
    })
}

fn invalid_option(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn seconds_option(key: &str, value: &Value) -> Result<Duration, ConfigError> {
    let secs = value
        .as_f64()
        .ok_or_else(|| invalid_option(key, "expected a number of seconds"))?;

    Duration::try_from_secs_f64(secs).map_err(|e| invalid_option(key, &e.to_string()))
}

fn headers_option(key: &str, value: &Value) -> Result<HeaderMap, ConfigError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid_option(key, "expected a table of header values"))?;

    let mut headers = HeaderMap::new();
    for (name, value) in object {
        let text = value
            .as_str()
            .ok_or_else(|| invalid_option(key, &format!("header '{name}' must be a string")))?;
        headers.insert(parse_header_name(name)?, parse_header_value(name, text)?);
    }

    Ok(headers)
}
