//! Executor handle and the middleware contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Future returned by an [`Executor`].
pub type ExecutorFuture = BoxFuture<'static, Result<HttpResponse, HttpError>>;

/// A cloneable request-executing function.
///
/// The transport's send operation is the innermost executor; every
/// middleware layer turns the executor below it into a new one.
/// Clones share the same underlying function.
#[derive(Clone)]
pub struct Executor {
    inner: Arc<dyn Fn(HttpRequest) -> ExecutorFuture + Send + Sync>,
}

impl Executor {
    /// Creates an executor from an async function.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HttpError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req| -> ExecutorFuture { Box::pin(f(req)) }),
        }
    }

    /// Creates the terminal executor that sends through an [`HttpClient`].
    pub fn from_client<H>(client: Arc<H>) -> Self
    where
        H: HttpClient + 'static,
    {
        Self::from_fn(move |req| {
            let client = Arc::clone(&client);
            async move { client.request(req).await }
        })
    }

    /// Executes a request.
    pub fn call(&self, req: HttpRequest) -> ExecutorFuture {
        (self.inner)(req)
    }

    /// Returns true if both handles share the same underlying function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

/// A composable wrapper around a request executor.
///
/// A middleware receives the executor for the rest of the chain and
/// returns the executor that replaces it. It may rewrite the request
/// before forwarding, inspect or replace the outcome afterwards, or call
/// `next` several times.
///
/// Any `Fn(Executor) -> Executor` closure is a middleware:
///
/// ```
/// use hookline::middleware::{Executor, Middleware};
///
/// let add_header = |next: Executor| {
///     Executor::from_fn(move |mut req| {
///         req.headers.insert("x-trace", http::HeaderValue::from_static("1"));
///         next.call(req)
///     })
/// };
///
/// fn assert_middleware<M: Middleware>(_: &M) {}
/// assert_middleware(&add_header);
/// ```
pub trait Middleware: Send + Sync {
    /// Wraps `next`, returning the executor that takes its place.
    fn wrap(&self, next: Executor) -> Executor;
}

impl<F> Middleware for F
where
    F: Fn(Executor) -> Executor + Send + Sync,
{
    fn wrap(&self, next: Executor) -> Executor {
        self(next)
    }
}
