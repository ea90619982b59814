use crate::error::RequestError;
use crate::request::format::ACTION_CREATING_ACCOUNT;
use crate::request::{Method, RequestClient, RequestDescriptor, format_request_error, server_message_from_body};

use serde_json::json;

/// **VALUE**: Verifies that a JSON string error body is used verbatim.
///
/// **WHY THIS MATTERS**: The Meiki server answers rejections with a bare JSON string
/// such as `"User already exists"`. The user must see exactly that text.
#[test]
fn given_json_string_body_when_extracting_message_then_returns_string_verbatim() {
    let message = server_message_from_body("\"User already exists\"").unwrap();

    assert_eq!(message, "User already exists");
}

/// **VALUE**: Verifies that `{message: ...}` objects are unwrapped.
#[test]
fn given_message_object_body_when_extracting_message_then_returns_message_field() {
    let message = server_message_from_body(r#"{"message":"Password does not match"}"#).unwrap();

    assert_eq!(message, "Password does not match");
}

#[test]
fn given_error_object_body_when_extracting_message_then_falls_back_to_error_field() {
    let message = server_message_from_body(r#"{"error":"Unauthorized"}"#).unwrap();

    assert_eq!(message, "Unauthorized");
}

#[test]
fn given_unrecognized_json_body_when_extracting_message_then_returns_compact_json() {
    let message = server_message_from_body(r#"{"code":42}"#).unwrap();

    assert_eq!(message, r#"{"code":42}"#);
}

/// **VALUE**: Verifies that a non-JSON error body is a decode failure.
///
/// **BUG THIS CATCHES**: Would catch a change that surfaces raw HTML from a proxy
/// error page as if the server had written it for the user.
#[test]
fn given_non_json_body_when_extracting_message_then_returns_decode_error() {
    let result = server_message_from_body("<html>Bad Gateway</html>");

    assert!(matches!(result, Err(RequestError::Decode { .. })));
}

/// **VALUE**: Verifies the formatter returns server text verbatim for rejections.
#[test]
fn given_server_rejected_error_when_formatted_then_returns_server_message() {
    let error = RequestError::server_rejected(409, "User already exists");

    let message = format_request_error(&error, ACTION_CREATING_ACCOUNT);

    assert_eq!(message, "User already exists");
}

/// **VALUE**: Verifies every non-rejection variant maps to the generic template.
///
/// **WHY THIS MATTERS**: The template is part of the user-visible text contract.
#[test]
fn given_non_rejection_errors_when_formatted_then_uses_generic_template() {
    let errors = [
        RequestError::Transport {
            message: "connection refused".to_string(),
            is_timeout: false,
            is_connection: true,
            location: common::ErrorLocation::from(std::panic::Location::caller()),
        },
        RequestError::decode("expected value"),
        RequestError::from(url::ParseError::EmptyHost),
    ];

    for error in &errors {
        assert_eq!(
            format_request_error(error, "logging out"),
            "An error has occurred while logging out, unable to connect to server"
        );
    }
}

/// **VALUE**: Verifies the action label is inserted as opaque text.
#[test]
fn given_free_form_action_when_formatted_then_inserted_as_is() {
    let error = RequestError::decode("bad body");

    let message = format_request_error(&error, "syncing notes");

    assert_eq!(
        message,
        "An error has occurred while syncing notes, unable to connect to server"
    );
}

#[test]
fn given_error_variants_when_categorized_then_categories_match() {
    assert_eq!(RequestError::server_rejected(409, "x").error_category(), "client_error");
    assert_eq!(RequestError::server_rejected(500, "x").error_category(), "server_error");
    assert_eq!(RequestError::server_rejected(204, "x").error_category(), "server_rejected");
    assert_eq!(RequestError::decode("x").error_category(), "decode");
    assert_eq!(RequestError::server_rejected(409, "x").status_code(), Some(409));
    assert_eq!(RequestError::decode("x").status_code(), None);
    assert_eq!(RequestError::server_rejected(409, "dup").server_message(), Some("dup"));
}

/// **VALUE**: Verifies only POST and PUT carry a body.
#[test]
fn given_methods_when_checking_body_then_only_post_and_put_carry_one() {
    assert!(RequestDescriptor::new("/x", Method::POST).carries_body());
    assert!(RequestDescriptor::new("/x", Method::PUT).carries_body());
    assert!(!RequestDescriptor::new("/x", Method::GET).carries_body());
    assert!(!RequestDescriptor::new("/x", Method::DELETE).carries_body());
}

#[test]
fn given_new_descriptor_when_created_then_body_defaults_to_empty_object() {
    let descriptor = RequestDescriptor::post("/auth/logout");

    assert_eq!(descriptor.body, json!({}));
}

/// **VALUE**: Verifies descriptor Debug output never contains body values.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug leaking passwords into logs.
#[test]
fn given_descriptor_with_password_when_debug_formatted_then_value_hidden() {
    let descriptor =
        RequestDescriptor::post("/login").with_body(json!({"username": "alex", "password": "hunter22"}));

    let debug = format!("{:?}", descriptor);

    assert!(debug.contains("password"), "field name is fine to show");
    assert!(!debug.contains("hunter22"), "value must not be shown");
}

/// **VALUE**: Verifies browser-style URL resolution against the base.
#[test]
fn given_base_url_when_resolving_paths_then_uses_join_semantics() {
    let client = RequestClient::new("http://localhost:8080").unwrap();

    assert_eq!(
        client.resolve("/create").unwrap().as_str(),
        "http://localhost:8080/create"
    );
    assert_eq!(
        client.resolve("auth/logout").unwrap().as_str(),
        "http://localhost:8080/auth/logout"
    );
    assert_eq!(
        client.resolve("http://other:9000/login").unwrap().as_str(),
        "http://other:9000/login"
    );
}

#[test]
fn given_invalid_base_url_when_creating_client_then_returns_url_parse_error() {
    let result = RequestClient::new("not a url");

    assert!(matches!(result, Err(RequestError::UrlParse { .. })));
}
