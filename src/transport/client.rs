//! Production HTTP client implementation using reqwest.

use crate::config::TransportOptions;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait. Connection pooling and TLS are left to
/// reqwest; only timeouts and default headers are configured here.
///
/// # Example
///
/// ```no_run
/// use hookline::transport::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.example.com/webhook")?;
/// let request = HttpRequest::post(url).with_body(b"hello".to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    debug: bool,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            debug: false,
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (TLS, proxies, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self {
            inner: client,
            debug: false,
        }
    }

    /// Creates an HTTP client from resolved transport options.
    ///
    /// Applies the total timeout, the connect timeout and the default
    /// headers. When `debug` is set, every exchange is logged at debug level.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Client`] if reqwest cannot build the client.
    pub fn from_options(options: &TransportOptions) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .default_headers(options.headers.clone())
            .build()
            .map_err(|e| HttpError::Client(Box::new(e)))?;

        Ok(Self {
            inner,
            debug: options.debug,
        })
    }

    /// Returns true if exchanges are logged at debug level.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        if self.debug {
            tracing::debug!(method = %req.method, url = %req.url, "Sending HTTP request");
        }

        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        if self.debug {
            tracing::debug!(%status, bytes = body.len(), "Received HTTP response");
        }

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Maps a reqwest send error onto the transport error kinds.
fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
