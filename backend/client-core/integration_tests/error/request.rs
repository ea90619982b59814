use client_core::RequestError;

use std::error::Error;

/// **VALUE**: Verifies that `RequestError::ServerRejected` includes file/line/column location tracking.
///
/// **WHY THIS MATTERS**: A rejection can come from any endpoint. The log line must say
/// where the error was built, not just that the server said no.
///
/// **BUG THIS CATCHES**: Would catch if someone:
/// - Removes the `location` field from RequestError
/// - Breaks the Display implementation to not include location
/// - Removes `#[track_caller]` from the constructor
#[test]
fn given_server_rejected_error_when_formatted_then_includes_status_message_and_location() {
    // GIVEN: A rejection built in this file
    let err = RequestError::server_rejected(409, "User already exists");

    // WHEN: Formatting the error as string
    let error_string = format!("{}", err);

    // THEN: Should include error type, status, message, and file location
    assert!(error_string.contains("Server Rejected Error"));
    assert!(error_string.contains("409"));
    assert!(error_string.contains("User already exists"));
    assert!(error_string.contains("request.rs"));
}

#[test]
fn given_decode_error_when_formatted_then_includes_location() {
    let err = RequestError::decode("expected value at line 1 column 1");

    let error_string = format!("{}", err);

    assert!(error_string.contains("Decode Error"));
    assert!(error_string.contains("request.rs"));
}

/// **VALUE**: Verifies a malformed JSON payload converts into the decode variant.
#[test]
fn given_serde_json_error_when_converted_then_decode_variant() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    let err = RequestError::from(json_err);

    assert_eq!(err.error_category(), "decode");
    assert!(err.source().is_none());
}

#[test]
fn given_url_parse_error_when_converted_then_url_parse_variant() {
    let parse_err = url::Url::parse("not a url").unwrap_err();

    let err = RequestError::from(parse_err);

    assert_eq!(err.error_category(), "url_parse");
    assert!(!err.is_server_rejected());
}
