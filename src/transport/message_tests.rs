//! Tests for HTTP request/response types.

use super::{HttpRequest, HttpResponse};
use std::time::Duration;

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let url = url::Url::parse("https://example.com/api").unwrap();
        let req = HttpRequest::new(http::Method::PUT, url.clone());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, url);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn get_and_post_set_method() {
        let url = url::Url::parse("https://example.com/").unwrap();

        assert_eq!(HttpRequest::get(url.clone()).method, http::Method::GET);
        assert_eq!(HttpRequest::post(url).method, http::Method::POST);
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let url = url::Url::parse("https://example.com/").unwrap();
        let req = HttpRequest::get(url)
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/html"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn builder_pattern_chains_correctly() {
        let url = url::Url::parse("https://example.com/api").unwrap();
        let req = HttpRequest::post(url)
            .with_body(b"data".to_vec())
            .with_timeout(Duration::from_secs(2));

        assert_eq!(req.body, Some(b"data".to_vec()));
        assert_eq!(req.timeout, Some(Duration::from_secs(2)));
    }
}

mod http_response {
    use super::*;

    fn response(status: http::StatusCode) -> HttpResponse {
        HttpResponse::new(status, http::HeaderMap::new(), vec![])
    }

    #[test]
    fn is_success_only_for_2xx() {
        assert!(response(http::StatusCode::OK).is_success());
        assert!(response(http::StatusCode::NO_CONTENT).is_success());
        assert!(!response(http::StatusCode::FOUND).is_success());
        assert!(!response(http::StatusCode::NOT_FOUND).is_success());
    }

    #[test]
    fn is_error_from_400_upwards() {
        assert!(!response(http::StatusCode::OK).is_error());
        assert!(!response(http::StatusCode::NOT_MODIFIED).is_error());
        assert!(response(http::StatusCode::BAD_REQUEST).is_error());
        assert!(response(http::StatusCode::SERVICE_UNAVAILABLE).is_error());
    }

    #[test]
    fn body_text_returns_none_for_invalid_utf8() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xFF, 0xFE],
        );

        assert!(resp.body_text().is_none());
    }

    #[test]
    fn header_line_joins_values() {
        let mut headers = http::HeaderMap::new();
        headers.append(http::header::VARY, http::HeaderValue::from_static("Accept"));
        headers.append(
            http::header::VARY,
            http::HeaderValue::from_static("Origin"),
        );
        let resp = HttpResponse::new(http::StatusCode::OK, headers, vec![]);

        assert_eq!(resp.header_line(http::header::VARY), "Accept, Origin");
    }

    #[test]
    fn header_line_is_empty_when_missing() {
        let resp = response(http::StatusCode::OK);

        assert_eq!(resp.header_line(http::header::CONTENT_TYPE), "");
    }

    #[test]
    fn header_line_is_case_insensitive() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        let resp = HttpResponse::new(http::StatusCode::OK, headers, vec![]);

        assert_eq!(resp.header_line("Content-Type"), "application/json");
    }
}
