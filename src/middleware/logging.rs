//! Request logging middleware.

use std::time::Instant;

use super::{Executor, Middleware};

/// Logs each exchange passing through its layer.
///
/// Requests are logged at debug level; the outcome is logged at debug
/// level with the elapsed time, or at warn level when the transport
/// failed. Headers are only logged at trace level and only when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware {
    log_headers: bool,
}

impl LoggingMiddleware {
    /// Creates a logging middleware that leaves headers out.
    #[must_use]
    pub const fn new() -> Self {
        Self { log_headers: false }
    }

    /// Enables trace-level logging of request and response headers.
    #[must_use]
    pub const fn with_headers(mut self) -> Self {
        self.log_headers = true;
        self
    }
}

impl Middleware for LoggingMiddleware {
    fn wrap(&self, next: Executor) -> Executor {
        let log_headers = self.log_headers;

        Executor::from_fn(move |request| {
            let next = next.clone();
            async move {
                let method = request.method.clone();
                let url = request.url.clone();
                tracing::debug!(%method, %url, "Sending HTTP request");
                if log_headers {
                    for (name, value) in &request.headers {
                        tracing::trace!(header = %name, value = ?value, "Request header");
                    }
                }

                let start = Instant::now();
                let outcome = next.call(request).await;
                let elapsed = start.elapsed();

                match &outcome {
                    Ok(response) => {
                        tracing::debug!(%method, %url, status = %response.status, ?elapsed, "Received HTTP response");
                        if log_headers {
                            for (name, value) in &response.headers {
                                tracing::trace!(header = %name, value = ?value, "Response header");
                            }
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%method, %url, ?elapsed, "HTTP request failed: {error}");
                    }
                }

                outcome
            }
        })
    }
}
