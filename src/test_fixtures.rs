//! Shared test fixtures for transport, middleware and dispatcher tests.

use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock HTTP client that returns a configurable sequence of outcomes.
///
/// Once the scripted outcomes run out, every further request gets an
/// empty `200 OK`.
#[derive(Debug, Default)]
pub struct MockClient {
    outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self::new(vec![Ok(response(200, None, ""))])
    }

    pub fn always_connection_error(times: usize) -> Self {
        Self::new((0..times).map(|_| Err(connection_error())).collect())
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(response(200, None, "")))
    }
}

/// Builds a response with an optional content type.
pub fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
    let mut headers = http::HeaderMap::new();
    if let Some(content_type) = content_type {
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_str(content_type).unwrap(),
        );
    }

    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        headers,
        body.as_bytes().to_vec(),
    )
}

pub fn connection_error() -> HttpError {
    HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

pub fn test_request() -> HttpRequest {
    HttpRequest::get(url::Url::parse("https://example.com/resource").unwrap())
}

/// A sleeper that records every requested delay instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
