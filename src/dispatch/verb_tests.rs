//! Tests for `Verb`.

use super::{RequestError, Verb};

#[test]
fn parses_case_insensitively() {
    for input in ["get", "GET", "Get", " gEt "] {
        assert_eq!(input.parse::<Verb>().unwrap(), Verb::Get);
    }
    assert_eq!("options".parse::<Verb>().unwrap(), Verb::Options);
}

#[test]
fn every_verb_round_trips_through_its_name() {
    for verb in Verb::ALL {
        assert_eq!(verb.as_str().parse::<Verb>().unwrap(), verb);
        assert_eq!(verb.to_string(), verb.as_str());
    }
}

#[test]
fn unknown_verb_is_rejected() {
    let err = "TRACE".parse::<Verb>().unwrap_err();

    assert!(matches!(err, RequestError::UnsupportedMethod(ref m) if m == "TRACE"));
    assert_eq!(err.to_string(), "Unsupported HTTP method 'TRACE'");
}

#[test]
fn empty_verb_is_rejected() {
    assert!(matches!(
        "".parse::<Verb>(),
        Err(RequestError::UnsupportedMethod(_))
    ));
}

#[test]
fn converts_to_http_method() {
    assert_eq!(http::Method::from(Verb::Patch), http::Method::PATCH);
    assert_eq!(Verb::Head.method(), http::Method::HEAD);
}
