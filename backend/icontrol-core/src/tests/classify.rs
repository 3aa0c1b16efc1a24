// Unit tests for outcome classification helpers

use crate::dispatch::classify::{api_failure, extract_message, parse_payload};
use crate::error::IControlError;

use common::HttpStatusCode;

use serde_json::json;

/// **VALUE**: Verifies the API failure carries the body's message and the status.
///
/// **WHY THIS MATTERS**: The appliance explains rejections in `message`; that text is
/// the only actionable diagnostic a caller gets.
///
/// **BUG THIS CATCHES**: Would catch a message taken from the wrong field or a
/// status code lost in classification.
#[test]
fn given_404_with_message_when_classified_then_api_failure_has_both() {
    // GIVEN: A 404 body with a message
    let body = br#"{"code":404,"message":"not found"}"#;

    // WHEN: Classifying
    let error = api_failure(HttpStatusCode(404), body, "http://host/mgmt/tm/ltm/pool/p1");

    // THEN: Message and status survive
    match error {
        IControlError::Api {
            message,
            status_code,
            url,
            ..
        } => {
            assert_eq!(message, "not found");
            assert_eq!(status_code, HttpStatusCode(404));
            assert_eq!(url, "http://host/mgmt/tm/ltm/pool/p1");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

/// **VALUE**: Verifies a missing or unreadable message degrades to an empty string.
///
/// **BUG THIS CATCHES**: Would catch classification itself failing (or panicking) on
/// an HTML error page from a proxy in front of the appliance.
#[test]
fn given_body_without_message_when_extracting_then_returns_empty() {
    assert_eq!(extract_message(br#"{"code":500}"#), "");
    assert_eq!(extract_message(b"<html>Bad Gateway</html>"), "");
    assert_eq!(extract_message(b""), "");
    assert_eq!(extract_message(br#"{"message":42}"#), "");
}

#[test]
fn given_empty_200_body_when_parsed_then_payload_is_null() {
    let payload = parse_payload(b"", "http://host/x").expect("empty body is fine");

    assert_eq!(payload, serde_json::Value::Null);
}

#[test]
fn given_json_200_body_when_parsed_then_payload_matches() {
    let payload = parse_payload(br#"{"kind":"tm:ltm:pool:poolstate","name":"p1"}"#, "u")
        .expect("valid json");

    assert_eq!(payload, json!({"kind": "tm:ltm:pool:poolstate", "name": "p1"}));
}

#[test]
fn given_non_json_200_body_when_parsed_then_invalid_response() {
    let result = parse_payload(b"OK", "http://host/x");

    assert!(matches!(result, Err(IControlError::InvalidResponse { .. })));
}
