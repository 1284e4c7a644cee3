//! Tests for notification content.

use super::{ErrorDetail, MessageType, NotificationContext, NotifyError};
use serde_json::json;

#[test]
fn message_type_parses_text_only() {
    assert_eq!("text".parse::<MessageType>().unwrap(), MessageType::Text);
    assert_eq!("TEXT".parse::<MessageType>().unwrap(), MessageType::Text);
    assert!(matches!(
        "markdown".parse::<MessageType>(),
        Err(NotifyError::UnsupportedMessageType(ref t)) if t == "markdown"
    ));
    assert_eq!(MessageType::default().to_string(), "text");
}

#[test]
fn content_without_error() {
    let context = NotificationContext::new("Import failed").with_payload(json!({"batch": 42}));

    assert_eq!(
        context.content().unwrap(),
        "Import failed\nParameters:\n{\n  \"batch\": 42\n}"
    );
}

#[test]
fn content_with_null_payload() {
    let context = NotificationContext::new("ping");

    assert_eq!(context.content().unwrap(), "ping\nParameters:\nnull");
}

#[test]
fn content_with_error_appends_debug_block() {
    let error = ErrorDetail::new(500, "boom").with_location("src/job.rs", 12);
    let context = NotificationContext::new("Job crashed")
        .with_payload(json!([1]))
        .with_error(error);

    let content = context.content().unwrap();

    assert_eq!(
        content,
        "Job crashed\nParameters:\n[\n  1\n]\nDebug:\n{\n  \"code\": 500,\n  \"message\": \"boom\",\n  \"line\": 12,\n  \"file\": \"src/job.rs\"\n}"
    );
}

#[test]
fn error_detail_records_caller_location() {
    let line = line!() + 1;
    let error = ErrorDetail::new(1, "here");

    assert_eq!(error.line, line);
    assert!(error.file.ends_with("message_tests.rs"));
}

#[test]
fn error_detail_from_error_includes_sources() {
    let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let outer = crate::config::ConfigError::FileRead {
        path: "hookline.toml".into(),
        source: inner,
    };

    let error = ErrorDetail::from_error(2, &outer);

    assert_eq!(error.code, 2);
    assert_eq!(
        error.message,
        "Failed to read config file 'hookline.toml': missing file: missing file"
    );
}

#[test]
fn text_message_body_shape() {
    let context = NotificationContext::new("hello");

    let body = context.message(MessageType::Text).unwrap();

    assert_eq!(
        body,
        json!({"msgtype": "text", "text": {"content": "hello\nParameters:\nnull"}})
    );
}

#[test]
fn serialized_payload() {
    #[derive(serde::Serialize)]
    struct Job {
        id: u32,
    }

    let context = NotificationContext::new("x")
        .with_serialized(&Job { id: 3 })
        .unwrap();

    assert_eq!(context.payload(), &json!({"id": 3}));
    assert!(context.error().is_none());
    assert_eq!(context.description(), "x");
}
