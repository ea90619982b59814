use client_core::error::ConfigError;
use client_core::{FlowError, RequestError};

use common::ErrorLocation;

use std::panic::Location;

use log::warn;
use thiserror::Error;

/// Errors that can end a `meiki` invocation.
///
/// `message` is what gets printed to the user; the location goes to the log.
#[derive(Debug, Error)]
pub enum MeikiError {
    /// Error from this App (logger, directories)
    #[error("Meiki Error: {message} {location}")]
    Meiki {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be resolved
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// The auth flow refused or failed the command
    #[error("Flow Error: {message} {location}")]
    Flow {
        message: String,
        location: ErrorLocation,
    },
}

impl MeikiError {
    /// Text for the terminal, without variant prefix or location.
    pub fn user_message(&self) -> &str {
        match self {
            MeikiError::Meiki { message, .. }
            | MeikiError::Config { message, .. }
            | MeikiError::Flow { message, .. } => message,
        }
    }
}

impl From<FlowError> for MeikiError {
    #[track_caller]
    fn from(error: FlowError) -> Self {
        MeikiError::Flow {
            message: error.user_message(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for MeikiError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        warn!("{error}");
        MeikiError::Config {
            message: error.user_message(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<RequestError> for MeikiError {
    #[track_caller]
    fn from(error: RequestError) -> Self {
        MeikiError::Meiki {
            message: format!("Failed to build HTTP client: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
