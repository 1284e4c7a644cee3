//! The request dispatcher: options in, response out.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use url::Url;

use crate::config::{ClientConfig, ConfigError, TransportOptions};
use crate::middleware::{Executor, Middleware, MiddlewareStack, RetryMiddleware};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};

use super::{PostData, RequestError, RequestOptions, Unwrapped, Verb, unwrap_response};

/// Sends requests through a middleware chain wrapped around a transport.
///
/// A dispatcher owns its [`ClientConfig`], its [`MiddlewareStack`] and,
/// optionally, an injected transport. Without one, a [`ReqwestClient`] is
/// built from the resolved options the first time a request is sent.
///
/// Overlay entries of the configuration that are not transport settings
/// (`query`, `http_errors`, `form_params`, ...) act as default
/// [`RequestOptions`] for every request.
///
/// Retry is not part of the ordered middleware: it always wraps the
/// transport directly, so only the transport call is repeated and every
/// pushed middleware runs once per request.
///
/// The chain is composed once and reused. Changing the configuration, the
/// middleware or the transport drops it, so the next request rebuilds it
/// with the new settings.
///
/// # Example
///
/// ```no_run
/// use hookline::dispatch::{Dispatcher, RequestOptions, Verb};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.set_base_uri("https://api.example.com/ignored/path")?;
/// dispatcher.enable_retry(3, 200);
///
/// let response = dispatcher
///     .request(Verb::Get, "/v1/status", RequestOptions::new().with_query("verbose", "1"))
///     .await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Dispatcher {
    config: ClientConfig,
    stack: MiddlewareStack,
    retry: Option<Arc<dyn Middleware>>,
    transport: Option<Executor>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("stack", &self.stack)
            .field("retry", &self.retry.is_some())
            .field("transport", &self.transport)
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with default configuration and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self.stack.reset();
        self
    }

    /// Sends through `client` instead of a default [`ReqwestClient`].
    #[must_use]
    pub fn with_transport<H>(self, client: H) -> Self
    where
        H: HttpClient + 'static,
    {
        self.with_shared_transport(Arc::new(client))
    }

    /// Sends through a shared client.
    #[must_use]
    pub fn with_shared_transport<H>(mut self, client: Arc<H>) -> Self
    where
        H: HttpClient + 'static,
    {
        self.set_transport(Executor::from_client(client));
        self
    }

    /// Replaces the terminal executor in place.
    pub fn set_transport(&mut self, transport: Executor) -> &mut Self {
        self.transport = Some(transport);
        self.stack.reset();
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sets the base URI, keeping only `scheme://host[:port]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the URI has no host.
    pub fn set_base_uri(&mut self, url: &str) -> Result<&mut Self, ConfigError> {
        self.config.set_base_uri(url)?;
        self.stack.reset();
        Ok(self)
    }

    /// Sets the total request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.set_timeout(timeout);
        self.stack.reset();
        self
    }

    /// Sets the connect timeout.
    pub fn set_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.set_connect_timeout(timeout);
        self.stack.reset();
        self
    }

    /// Replaces the transport options overlay.
    pub fn set_http_options(&mut self, options: Map<String, Value>) -> &mut Self {
        self.config.set_http_options(options);
        self.stack.reset();
        self
    }

    /// Adds a middleware, optionally under a name.
    ///
    /// See [`MiddlewareStack::push`] for the ordering rules.
    pub fn push_middleware<M>(&mut self, middleware: M, name: Option<&str>) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.stack.push(middleware, name);
        self
    }

    /// Removes the middleware registered under `name`.
    pub fn remove_middleware(&mut self, name: &str) -> bool {
        self.stack.remove(name)
    }

    /// Returns the middleware stack.
    #[must_use]
    pub const fn middleware(&self) -> &MiddlewareStack {
        &self.stack
    }

    /// Enables retries with linear backoff.
    ///
    /// The retry layer sits directly around the transport, inside every
    /// pushed middleware. Calling it again replaces the previous policy.
    /// Zero values fall back to 1 retry and 1000 ms.
    pub fn enable_retry(&mut self, max_retries: u32, interval_millis: u64) -> &mut Self {
        self.enable_retry_with(RetryMiddleware::with_policy(max_retries, interval_millis))
    }

    /// Enables retries through a custom retry middleware.
    pub fn enable_retry_with<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.retry = Some(Arc::new(middleware));
        self.stack.reset();
        self
    }

    /// Disables retries. Returns `false` if they were not enabled.
    pub fn disable_retry(&mut self) -> bool {
        self.stack.reset();
        self.retry.take().is_some()
    }

    /// Returns true if a retry layer is installed.
    #[must_use]
    pub const fn retry_enabled(&self) -> bool {
        self.retry.is_some()
    }

    /// Sends a request and returns the response.
    ///
    /// Responses with an error status are returned as `Ok` unless
    /// [`RequestOptions::with_http_errors`] was set.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the configuration or options are
    /// invalid, the endpoint cannot be resolved, the exchange fails, or
    /// `http_errors` is set and the final status is 400 or above.
    pub async fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        let resolved = self.config.options()?;
        let options = options.or_defaults(RequestOptions::from_map(&resolved.extra)?);
        let request = build_request(&resolved, verb, endpoint, &options)?;
        let debug = resolved.debug || options.debug();

        if debug {
            tracing::debug!(%verb, url = %request.url, "Dispatching request");
        }

        let chain = self.chain(&resolved)?;
        let response = chain.call(request).await?;

        if debug {
            tracing::debug!(%verb, status = %response.status, bytes = response.body.len(), "Request completed");
        }

        if options.http_errors() && response.is_error() {
            return Err(RequestError::Status {
                status: response.status,
                response: Box::new(response),
            });
        }

        Ok(response)
    }

    /// Sends a request and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`request`](Self::request), or
    /// [`RequestError::Decode`] if the body does not match its content type.
    pub async fn request_unwrap(
        &self,
        verb: Verb,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Unwrapped, RequestError> {
        let response = self.request(verb, endpoint, options).await?;
        Ok(unwrap_response(&response)?)
    }

    /// Sends a GET request with query pairs and headers.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, RequestError> {
        let options = RequestOptions::new()
            .with_query_pairs(query.iter().copied())
            .with_headers(headers.iter().copied());
        self.request(Verb::Get, endpoint, options).await
    }

    /// Sends a POST request.
    ///
    /// Form data becomes a url-encoded body; raw data is sent as is.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(
        &self,
        endpoint: &str,
        data: impl Into<PostData>,
        options: RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        let options = data.into().into_options(options);
        self.request(Verb::Post, endpoint, options).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        self.request(Verb::Put, endpoint, options).await
    }

    /// Sends a PATCH request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        self.request(Verb::Patch, endpoint, options).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        self.request(Verb::Delete, endpoint, options).await
    }

    /// Returns the memoized chain, building the default transport if none
    /// was injected. The retry layer wraps the transport before the stack
    /// folds over it.
    fn chain(&self, resolved: &TransportOptions) -> Result<Executor, RequestError> {
        let chain = self.stack.try_build(|| {
            let transport = match &self.transport {
                Some(transport) => transport.clone(),
                None => Executor::from_client(Arc::new(ReqwestClient::from_options(resolved)?)),
            };
            Ok::<_, RequestError>(match &self.retry {
                Some(retry) => retry.wrap(transport),
                None => transport,
            })
        })?;
        Ok(chain)
    }
}

/// Assembles the outgoing request from resolved configuration and options.
fn build_request(
    resolved: &TransportOptions,
    verb: Verb,
    endpoint: &str,
    options: &RequestOptions,
) -> Result<HttpRequest, RequestError> {
    let url = resolve_url(&resolved.base_uri, endpoint, options.query())?;
    let mut request = HttpRequest::new(verb.method(), url);

    for (name, value) in options.headers() {
        let (name, value) = parse_header(name, value)?;
        request.headers.append(name, value);
    }
    for (name, value) in &resolved.headers {
        if !request.headers.contains_key(name) {
            request.headers.insert(name.clone(), value.clone());
        }
    }

    if let Some(body) = options.body() {
        let (bytes, content_type) = body.encode();
        if let Some(content_type) = content_type {
            if !request.headers.contains_key(CONTENT_TYPE) {
                request
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }
        request.body = Some(bytes);
    }

    request.timeout = options.timeout();
    Ok(request)
}

/// Resolves `endpoint` against the base URI and appends the query pairs.
///
/// Absolute endpoints ignore the base URI.
fn resolve_url(
    base_uri: &str,
    endpoint: &str,
    query: &[(String, String)],
) -> Result<Url, RequestError> {
    let invalid = |reason: String| RequestError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let mut url = match Url::parse(endpoint) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if base_uri.is_empty() {
                return Err(invalid("relative endpoint and no base URI".to_string()));
            }
            let base = Url::parse(base_uri).map_err(|e| invalid(e.to_string()))?;
            base.join(endpoint).map_err(|e| invalid(e.to_string()))?
        }
        Err(e) => return Err(invalid(e.to_string())),
    };

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), RequestError> {
    let invalid = |reason: String| RequestError::InvalidHeader {
        name: name.to_string(),
        reason,
    };

    let header_name = name
        .parse::<HeaderName>()
        .map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}
