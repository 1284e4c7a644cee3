//! End-to-end dispatcher tests against a local mock server.

use std::time::Duration;

use hookline::config::ClientConfig;
use hookline::dispatch::{Dispatcher, RequestError, RequestOptions, Unwrapped, Verb};
use hookline::middleware::{LoggingMiddleware, RetryMiddleware, RetryPolicy};
use hookline::time::InstantSleeper;
use hookline::transport::HttpError;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    let config = ClientConfig::new().with_base_uri(&server.uri()).unwrap();
    Dispatcher::new().with_config(config)
}

#[tokio::test]
async fn post_form_and_raw_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=alice&role=admin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/raw"))
        .and(body_string("<ping/>"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);

    let form = dispatcher
        .post(
            "/form",
            vec![("user", "alice"), ("role", "admin")],
            RequestOptions::new(),
        )
        .await
        .unwrap();
    let raw = dispatcher
        .post("/raw", "<ping/>", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(form.status, http::StatusCode::OK);
    assert_eq!(raw.status, http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn get_sends_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "hook line"))
        .and(header("x-client", "tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("found"))
        .expect(1)
        .mount(&server)
        .await;

    let response = dispatcher_for(&server)
        .get("/search", &[("q", "hook line")], &[("X-Client", "tests")])
        .await
        .unwrap();

    assert_eq!(response.body_text(), Some("found"));
}

#[tokio::test]
async fn unwrap_by_content_type() {
    let server = MockServer::start().await;
    Mock::given(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;
    Mock::given(path("/xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<xml><code>OK</code><n a=\"1\"/></xml>", "application/xml"),
        )
        .mount(&server)
        .await;
    Mock::given(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("plain", "text/plain"))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let unwrap = |endpoint: &'static str| {
        let dispatcher = dispatcher.clone();
        async move {
            dispatcher
                .request_unwrap(Verb::Get, endpoint, RequestOptions::new())
                .await
                .unwrap()
        }
    };

    assert_eq!(unwrap("/json").await, Unwrapped::Json(json!({"id": 1})));
    assert_eq!(
        unwrap("/xml").await,
        Unwrapped::Json(json!({"code": "OK", "n": {"@attributes": {"a": "1"}}}))
    );
    assert_eq!(unwrap("/text").await, Unwrapped::Text("plain".to_string()));
}

#[tokio::test]
async fn retry_resends_server_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&server)
        .await;

    let mut dispatcher = dispatcher_for(&server);
    dispatcher.enable_retry_with(
        RetryMiddleware::new(RetryPolicy::new(3, 1000)).with_sleeper(InstantSleeper),
    );

    let response = dispatcher.get("/flaky", &[], &[]).await.unwrap();

    assert_eq!(response.body_text(), Some("finally"));
}

#[tokio::test]
async fn retry_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let mut dispatcher = dispatcher_for(&server);
    dispatcher.push_middleware(LoggingMiddleware::new(), Some("log"));
    dispatcher.enable_retry_with(
        RetryMiddleware::new(RetryPolicy::new(2, 1000)).with_sleeper(InstantSleeper),
    );

    let err = dispatcher
        .request(Verb::Get, "/down", RequestOptions::new().with_http_errors(true))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RequestError::Status { status, .. } if status == http::StatusCode::SERVICE_UNAVAILABLE
    ));
}

#[tokio::test]
async fn timeout_is_a_connection_level_error() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = dispatcher_for(&server)
        .request(
            Verb::Get,
            "/slow",
            RequestOptions::new().with_timeout(Duration::from_millis(100)),
        )
        .await;

    assert!(matches!(result, Err(RequestError::Http(HttpError::Timeout))));
}

#[tokio::test]
async fn overlay_headers_are_sent_by_default() {
    let server = MockServer::start().await;
    Mock::given(path("/whoami"))
        .and(header("user-agent", "hookline-tests"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut dispatcher = dispatcher_for(&server);
    let overlay = json!({"headers": {"User-Agent": "hookline-tests"}});
    dispatcher.set_http_options(overlay.as_object().unwrap().clone());

    let response = dispatcher.get("/whoami", &[], &[]).await.unwrap();

    assert!(response.is_success());
}
