//! Errors surfaced by the authentication flow.
//!
//! Each variant knows the sentence the user should see; see
//! [`FlowError::user_message`].

use super::{RequestError, SessionError, ValidationError};
use crate::flow::FlowState;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FlowError {
    /// Rejected locally, nothing was sent.
    #[error("Validation Error: {source} {location}")]
    Validation {
        #[source]
        source: ValidationError,
        location: ErrorLocation,
    },

    /// The request failed; `message` is the formatted user-facing text.
    #[error("Request Error: {message} {location}")]
    Request {
        message: String,
        #[source]
        source: RequestError,
        location: ErrorLocation,
    },

    #[error("Session Error: {source} {location}")]
    Session {
        #[source]
        source: SessionError,
        location: ErrorLocation,
    },

    #[error("Invalid Transition Error: cannot {action} while {state} {location}")]
    InvalidTransition {
        action: &'static str,
        state: FlowState,
        location: ErrorLocation,
    },
}

impl FlowError {
    #[track_caller]
    pub fn validation(source: ValidationError) -> Self {
        FlowError::Validation {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn request(message: impl Into<String>, source: RequestError) -> Self {
        FlowError::Request {
            message: message.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn session(source: SessionError) -> Self {
        FlowError::Session {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_transition(action: &'static str, state: FlowState) -> Self {
        FlowError::InvalidTransition {
            action,
            state,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text to show the user, without location or variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation { source, .. } => source.to_string(),
            FlowError::Request { message, .. } => message.clone(),
            FlowError::Session { .. } => String::from("Unable to access the saved session"),
            FlowError::InvalidTransition { action, state, .. } => {
                format!("Cannot {action} while {state}")
            }
        }
    }

    /// Whether the failure came back from the request wrapper.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, FlowError::Request { .. })
    }
}
