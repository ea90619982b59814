// Unit tests for error module
// Tests conversion from core errors and the user-facing message

use crate::error::MeikiError;

use client_core::error::ConfigError;
use client_core::{FlowError, FlowState, RequestError, ValidationError};

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies a flow failure prints exactly the flow's user message.
///
/// **WHY THIS MATTERS**: The terminal must show "Passwords do not match", not the
/// variant prefix and source location used in logs.
#[test]
fn given_flow_error_when_converted_then_user_message_is_flow_text() {
    // GIVEN: A validation failure from the flow
    let flow_error = FlowError::validation(ValidationError::PasswordMismatch);

    // WHEN: Converting to the app error
    let err = MeikiError::from(flow_error);

    // THEN: Only the literal text is shown to the user
    assert_eq!(err.user_message(), "Passwords do not match");
    assert!(format!("{}", err).contains("Flow Error"));
}

#[test]
fn given_request_flow_error_when_converted_then_keeps_formatted_message() {
    let flow_error = FlowError::request(
        "User already exists",
        RequestError::server_rejected(409, "User already exists"),
    );

    let err = MeikiError::from(flow_error);

    assert_eq!(err.user_message(), "User already exists");
}

#[test]
fn given_invalid_transition_when_converted_then_names_state() {
    let err = MeikiError::from(FlowError::invalid_transition(
        "log in",
        FlowState::Authenticated,
    ));

    assert_eq!(err.user_message(), "Cannot log in while authenticated");
}

/// **VALUE**: Verifies config failures keep their reason.
#[test]
fn given_config_error_when_converted_then_config_variant() {
    let config_error = ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: "request_timeout_secs must be greater than 0".to_string(),
    };

    let err = MeikiError::from(config_error);

    assert!(matches!(err, MeikiError::Config { .. }));
    assert_eq!(
        err.user_message(),
        "request_timeout_secs must be greater than 0"
    );
}

/// **VALUE**: Verifies the terminal line for a config failure carries no source location.
///
/// **BUG THIS CATCHES**: Would catch the `[file:line:col]` suffix of the Display
/// output leaking into what the user reads.
#[test]
fn given_directory_not_found_when_converted_then_user_message_has_no_location() {
    let config_error = ConfigError::DirectoryNotFound {
        location: ErrorLocation::from(Location::caller()),
        what: "data directory",
    };

    let err = MeikiError::from(config_error);

    assert_eq!(err.user_message(), "Unable to determine the data directory");
    assert!(!err.user_message().contains(".rs:"));
}

#[test]
fn given_meiki_error_when_formatted_then_includes_location() {
    let err = MeikiError::Meiki {
        message: String::from("Failed to create data directory"),
        location: ErrorLocation::from(Location::caller()),
    };

    let error_string = format!("{}", err);

    assert!(error_string.contains("Meiki Error"));
    assert!(error_string.contains("error.rs"));
}
