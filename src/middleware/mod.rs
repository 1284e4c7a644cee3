//! Middleware layer wrapping the transport.
//!
//! This module provides:
//! - The executor handle every layer wraps ([`Executor`])
//! - The middleware contract ([`Middleware`])
//! - The ordered, named, memoized chain ([`MiddlewareStack`])
//! - Retry decision and backoff ([`RetryPolicy`], [`RetryStrategy`])
//! - The retry loop as a chain layer ([`RetryMiddleware`])
//! - Request logging ([`LoggingMiddleware`])
//!
//! # Ordering
//!
//! The first middleware pushed is the outermost layer: it sees the request
//! first and the response last. A stack only repeats what sits inside a
//! retry layer, so the dispatcher keeps retry out of the stack and wraps it
//! directly around the transport.

mod executor;
mod logging;
mod retry;
mod stack;


pub use executor::{Executor, ExecutorFuture, Middleware};
pub use logging::LoggingMiddleware;
pub use retry::{RetryMiddleware, RetryPolicy, RetryStrategy};
pub use stack::{MiddlewareKey, MiddlewareStack};
