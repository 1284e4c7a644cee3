//! Retry decision, linear backoff, and the retry loop middleware.

use std::sync::Arc;
use std::time::Duration;

use crate::config::defaults;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpError, HttpRequest, HttpResponse};

use super::{Executor, Middleware};

/// Decides whether an attempt is repeated and how long to wait first.
///
/// `attempt` counts the retries already performed: it is `0` when the
/// initial attempt has just finished, and the delay for the n-th retry is
/// requested with `attempt = n`.
pub trait RetryStrategy: Send + Sync {
    /// Returns true if the request should be sent again.
    ///
    /// Exactly one of `response` and `error` is `Some`.
    fn should_retry(
        &self,
        attempt: u32,
        request: &HttpRequest,
        response: Option<&HttpResponse>,
        error: Option<&HttpError>,
    ) -> bool;

    /// Returns the wait before retry number `attempt` (1-indexed).
    fn delay(&self, attempt: u32) -> Duration;
}

/// Retry ceiling plus linear backoff.
///
/// Retries connection-level failures and responses with status 400 or
/// above, until `max_retries` retries have been made. The wait before the
/// n-th retry is `interval * n`: linear, not exponential.
///
/// # Defaults
///
/// - `max_retries`: 3
/// - `interval`: 1000 ms
///
/// Zero values are raised at construction to a floor of 1 retry and
/// 1000 ms, so a policy never disables retrying.
///
/// # Example
///
/// ```
/// use hookline::middleware::{RetryPolicy, RetryStrategy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, 200);
///
/// assert_eq!(policy.delay(1), Duration::from_millis(200));
/// assert_eq!(policy.delay(3), Duration::from_millis(600));
///
/// // Non-positive input falls back to the floors
/// assert_eq!(RetryPolicy::new(0, 0), RetryPolicy::new(1, 1000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    interval: Duration,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = defaults::RETRY_MAX_RETRIES;

    /// Default base interval in milliseconds.
    pub const DEFAULT_INTERVAL_MILLIS: u64 = defaults::RETRY_INTERVAL_MILLIS;

    /// Smallest effective `max_retries`.
    pub const MIN_MAX_RETRIES: u32 = defaults::RETRY_MIN_RETRIES;

    /// Interval used in place of a zero interval, in milliseconds.
    pub const FLOOR_INTERVAL_MILLIS: u64 = defaults::RETRY_FLOOR_INTERVAL_MILLIS;

    /// Creates a policy, applying the floors to zero inputs.
    #[must_use]
    pub const fn new(max_retries: u32, interval_millis: u64) -> Self {
        let max_retries = if max_retries == 0 {
            Self::MIN_MAX_RETRIES
        } else {
            max_retries
        };
        let interval_millis = if interval_millis == 0 {
            Self::FLOOR_INTERVAL_MILLIS
        } else {
            interval_millis
        };

        Self {
            max_retries,
            interval: Duration::from_millis(interval_millis),
        }
    }

    /// Returns the effective number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the effective base interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_INTERVAL_MILLIS)
    }
}

impl RetryStrategy for RetryPolicy {
    fn should_retry(
        &self,
        attempt: u32,
        _request: &HttpRequest,
        response: Option<&HttpResponse>,
        error: Option<&HttpError>,
    ) -> bool {
        // The ceiling wins over every other condition
        if attempt >= self.max_retries {
            return false;
        }

        if error.is_some_and(HttpError::is_connection) {
            return true;
        }

        response.is_some_and(|r| r.status.as_u16() >= 400)
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.interval.saturating_mul(attempt)
    }
}

/// Middleware that re-sends a request while its strategy asks for it.
///
/// Attempts run one after another; the wait between them goes through the
/// sleeper. When the strategy stops, the last outcome is returned exactly
/// as received: an error response stays a response and a transport error
/// stays an error.
///
/// # Type Parameters
///
/// - `P`: The retry strategy (defaults to [`RetryPolicy`])
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct RetryMiddleware<P = RetryPolicy, S = TokioSleeper> {
    strategy: Arc<P>,
    sleeper: S,
}

impl<P> RetryMiddleware<P, TokioSleeper> {
    /// Creates a retry middleware waiting on the Tokio timer.
    #[must_use]
    pub fn new(strategy: P) -> Self {
        Self {
            strategy: Arc::new(strategy),
            sleeper: TokioSleeper,
        }
    }
}

impl RetryMiddleware<RetryPolicy, TokioSleeper> {
    /// Creates a retry middleware from `(max_retries, interval_millis)`.
    #[must_use]
    pub fn with_policy(max_retries: u32, interval_millis: u64) -> Self {
        Self::new(RetryPolicy::new(max_retries, interval_millis))
    }
}

impl<P, S> RetryMiddleware<P, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryMiddleware<P, S2> {
        RetryMiddleware {
            strategy: self.strategy,
            sleeper,
        }
    }

    /// Returns the retry strategy.
    #[must_use]
    pub fn strategy(&self) -> &P {
        &self.strategy
    }
}

impl<P, S> Middleware for RetryMiddleware<P, S>
where
    P: RetryStrategy + 'static,
    S: Sleeper + Clone + 'static,
{
    fn wrap(&self, next: Executor) -> Executor {
        let strategy = Arc::clone(&self.strategy);
        let sleeper = self.sleeper.clone();

        Executor::from_fn(move |request| {
            send_with_retry(
                next.clone(),
                Arc::clone(&strategy),
                sleeper.clone(),
                request,
            )
        })
    }
}

/// Runs the attempt loop for a single request.
async fn send_with_retry<P, S>(
    next: Executor,
    strategy: Arc<P>,
    sleeper: S,
    request: HttpRequest,
) -> Result<HttpResponse, HttpError>
where
    P: RetryStrategy,
    S: Sleeper,
{
    let mut retries = 0;

    loop {
        let outcome = next.call(request.clone()).await;

        let (response, error) = match &outcome {
            Ok(response) => (Some(response), None),
            Err(error) => (None, Some(error)),
        };
        if !strategy.should_retry(retries, &request, response, error) {
            return outcome;
        }

        retries += 1;
        let delay = strategy.delay(retries);
        let cause = match &outcome {
            Ok(response) => format!("status {}", response.status),
            Err(error) => error.to_string(),
        };
        tracing::warn!(
            method = %request.method,
            url = %request.url,
            retry = retries,
            ?delay,
            "Request failed ({cause}), retrying"
        );

        sleeper.sleep(delay).await;
    }
}
