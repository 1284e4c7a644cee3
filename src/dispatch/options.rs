//! Per-request options and POST payloads.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::ConfigError;

/// Content type sent with url-encoded form bodies unless overridden.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content type sent with JSON bodies unless overridden.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Bytes sent verbatim, with no default content type
    Raw(Vec<u8>),
    /// Pairs encoded as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// A value serialized as `application/json`
    Json(Value),
}

impl Body {
    /// Encodes the body, returning the bytes and the default content type.
    #[must_use]
    pub fn encode(&self) -> (Vec<u8>, Option<&'static str>) {
        match self {
            Self::Raw(bytes) => (bytes.clone(), None),
            Self::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                (encoded.into_bytes(), Some(FORM_CONTENT_TYPE))
            }
            Self::Json(value) => (value.to_string().into_bytes(), Some(JSON_CONTENT_TYPE)),
        }
    }
}

/// Options for a single request.
///
/// Headers given here are added on top of the dispatcher's default
/// headers; query pairs are appended to any query already present in the
/// endpoint. Setting a body replaces the previous one, whatever its kind.
///
/// # Example
///
/// ```
/// use hookline::dispatch::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .with_header("Accept", "application/json")
///     .with_query("page", "2")
///     .with_json(serde_json::json!({"name": "hookline"}))
///     .with_timeout(Duration::from_secs(2))
///     .with_http_errors(true);
///
/// assert_eq!(options.query(), [("page".to_string(), "2".to_string())]);
/// assert!(options.http_errors());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<Body>,
    timeout: Option<Duration>,
    http_errors: bool,
    debug: bool,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds several headers.
    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a query pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds several query pairs.
    #[must_use]
    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    /// Sets a url-encoded form body.
    #[must_use]
    pub fn with_form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(Body::Form(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_json(mut self, value: Value) -> Self {
        self.body = Some(Body::Json(value));
        self
    }

    /// Sets the timeout for this request only.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Turns responses with status 400 or above into errors.
    #[must_use]
    pub const fn with_http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }

    /// Logs this exchange at debug level.
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Builds options from a JSON object of option keys.
    ///
    /// Recognized keys: `headers` and `query` (objects of strings), `body`
    /// (string), `form_params` (object), `json` (any value), `timeout`
    /// (seconds), `http_errors` and `debug` (booleans). Unknown keys are
    /// ignored. When more than one body key is present, `json` wins over
    /// `form_params`, which wins over `body`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if a recognized key has the
    /// wrong type.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut options = Self::new();

        for (key, value) in map {
            match key.as_str() {
                "headers" => options.headers.extend(string_pairs(key, value)?),
                "query" => options.query.extend(string_pairs(key, value)?),
                "timeout" => {
                    let secs = value
                        .as_f64()
                        .ok_or_else(|| invalid_option(key, "expected a number of seconds"))?;
                    let timeout = Duration::try_from_secs_f64(secs)
                        .map_err(|e| invalid_option(key, &e.to_string()))?;
                    options.timeout = Some(timeout);
                }
                "http_errors" => options.http_errors = bool_option(key, value)?,
                "debug" => options.debug = bool_option(key, value)?,
                _ => {}
            }
        }

        options.body = if let Some(value) = map.get("json") {
            Some(Body::Json(value.clone()))
        } else if let Some(value) = map.get("form_params") {
            Some(Body::Form(string_pairs("form_params", value)?))
        } else if let Some(value) = map.get("body") {
            let text = value
                .as_str()
                .ok_or_else(|| invalid_option("body", "expected a string"))?;
            Some(Body::Raw(text.as_bytes().to_vec()))
        } else {
            None
        };

        Ok(options)
    }

    /// Fills what these options leave unset from `defaults`.
    ///
    /// Default headers are kept unless a header of the same name is set
    /// here. Default query pairs come first. The body and timeout fall back
    /// to the defaults; the flags are enabled if either side enables them.
    #[must_use]
    pub fn or_defaults(self, defaults: Self) -> Self {
        let mut headers: Vec<_> = defaults
            .headers
            .into_iter()
            .filter(|(name, _)| !self.has_header(name))
            .collect();
        headers.extend(self.headers);

        let mut query = defaults.query;
        query.extend(self.query);

        Self {
            headers,
            query,
            body: self.body.or(defaults.body),
            timeout: self.timeout.or(defaults.timeout),
            http_errors: self.http_errors || defaults.http_errors,
            debug: self.debug || defaults.debug,
        }
    }

    /// Returns the per-request headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the query pairs.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns true if error statuses become errors.
    #[must_use]
    pub const fn http_errors(&self) -> bool {
        self.http_errors
    }

    /// Returns true if the exchange is logged at debug level.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns true if a header with this name was given, ignoring case.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Data for a POST request.
///
/// Maps and pair lists become a url-encoded form; strings and bytes are
/// sent as the raw body.
///
/// ```
/// use hookline::dispatch::PostData;
/// use std::collections::BTreeMap;
///
/// let form: PostData = BTreeMap::from([("a", "1")]).into();
/// assert!(matches!(form, PostData::Form(_)));
///
/// let raw: PostData = "<xml/>".into();
/// assert!(matches!(raw, PostData::Raw(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostData {
    /// Form fields
    Form(Vec<(String, String)>),
    /// Raw body bytes
    Raw(Vec<u8>),
}

impl PostData {
    /// Stores the data in `options` as a form or raw body.
    #[must_use]
    pub fn into_options(self, options: RequestOptions) -> RequestOptions {
        match self {
            Self::Form(pairs) => options.with_form(pairs),
            Self::Raw(bytes) => options.with_body(bytes),
        }
    }

    fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for PostData {
    fn from(body: &str) -> Self {
        Self::Raw(body.as_bytes().to_vec())
    }
}

impl From<String> for PostData {
    fn from(body: String) -> Self {
        Self::Raw(body.into_bytes())
    }
}

impl From<Vec<u8>> for PostData {
    fn from(body: Vec<u8>) -> Self {
        Self::Raw(body)
    }
}

impl From<&[u8]> for PostData {
    fn from(body: &[u8]) -> Self {
        Self::Raw(body.to_vec())
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for PostData {
    fn from(map: HashMap<K, V>) -> Self {
        Self::form(map)
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for PostData {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::form(map)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for PostData {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::form(pairs)
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PostData {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::form(pairs)
    }
}

/// Objects become form fields; strings are sent verbatim; any other value
/// is sent as its JSON text.
impl From<Value> for PostData {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Form(
                map.into_iter()
                    .map(|(k, v)| (k, scalar_text(v)))
                    .collect(),
            ),
            Value::String(text) => Self::Raw(text.into_bytes()),
            other => Self::Raw(other.to_string().into_bytes()),
        }
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn invalid_option(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn bool_option(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or_else(|| invalid_option(key, "expected a boolean"))
}

fn string_pairs(key: &str, value: &Value) -> Result<Vec<(String, String)>, ConfigError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid_option(key, "expected a table"))?;

    object
        .iter()
        .map(|(name, value)| match value {
            Value::String(text) => Ok((name.clone(), text.clone())),
            Value::Number(_) | Value::Bool(_) => Ok((name.clone(), value.to_string())),
            _ => Err(invalid_option(
                key,
                &format!("'{name}' must be a string, number or boolean"),
            )),
        })
        .collect()
}
