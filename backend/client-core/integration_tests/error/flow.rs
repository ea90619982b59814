use client_core::{FlowError, FlowState, RequestError, ValidationError};

use std::error::Error;

/// **VALUE**: Verifies a wrapped request failure keeps its cause in the error chain.
///
/// **WHY THIS MATTERS**: The user sees only the formatted sentence; the log needs
/// the underlying transport or server detail.
#[test]
fn given_request_flow_error_when_inspecting_source_then_request_error_is_preserved() {
    // GIVEN: A flow error wrapping a rejection
    let err = FlowError::request(
        "User already exists",
        RequestError::server_rejected(409, "User already exists"),
    );

    // WHEN: Walking the source chain
    let source = err.source().expect("request error source");

    // THEN: The wrapped rejection is reachable
    assert!(source.to_string().contains("Server Rejected Error"));
    assert!(format!("{}", err).contains("flow.rs"));
}

#[test]
fn given_validation_flow_error_when_asking_user_message_then_literal_text() {
    let err = FlowError::validation(ValidationError::PasswordMismatch);

    assert_eq!(err.user_message(), "Passwords do not match");
    assert!(!err.is_request_failure());
}

#[test]
fn given_invalid_transition_when_formatted_then_names_action_and_state() {
    let err = FlowError::invalid_transition("log in", FlowState::Authenticated);

    assert_eq!(err.user_message(), "Cannot log in while authenticated");
    assert!(format!("{}", err).contains("Invalid Transition Error"));
}
