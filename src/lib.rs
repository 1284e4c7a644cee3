//! hookline: HTTP requests through a middleware chain.
//!
//! A request helper that sends through an ordered chain of middleware
//! around a swappable transport, retries failed attempts with linear
//! backoff, decodes JSON, XML and text responses, and posts notifications
//! to a group-chat webhook robot.

pub mod config;
pub mod dispatch;
pub mod middleware;
pub mod robot;
pub mod time;
pub mod transport;

#[cfg(test)]
mod test_fixtures;
