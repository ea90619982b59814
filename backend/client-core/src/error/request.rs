//! Error taxonomy for the request wrapper.
//!
//! There is exactly one distinguished kind: [`RequestError::ServerRejected`],
//! produced when a response arrived with a status other than 200. It is the only
//! variant whose message was written by the server. Everything else means "no
//! usable response" and is shown to the user through the generic template.

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("Server Rejected Error: HTTP {status} - {message} {location}")]
    ServerRejected {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl RequestError {
    #[track_caller]
    pub fn server_rejected(status: impl Into<HttpStatusCode>, message: impl Into<String>) -> Self {
        RequestError::ServerRejected {
            status: status.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        RequestError::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True only for a received non-200 response.
    pub fn is_server_rejected(&self) -> bool {
        matches!(self, RequestError::ServerRejected { .. })
    }

    /// The server-authored message, if the server produced one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RequestError::ServerRejected { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::ServerRejected { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    /// Get error category for logging.
    pub fn error_category(&self) -> &'static str {
        match self {
            RequestError::ServerRejected { status, .. } if status.is_client_error() => "client_error",
            RequestError::ServerRejected { status, .. } if status.is_server_error() => "server_error",
            RequestError::ServerRejected { .. } => "server_rejected",
            RequestError::Transport { is_timeout: true, .. } => "timeout",
            RequestError::Transport { is_connection: true, .. } => "connection",
            RequestError::Transport { .. } => "transport",
            RequestError::Decode { .. } => "decode",
            RequestError::UrlParse { .. } => "url_parse",
        }
    }
}

impl From<url::ParseError> for RequestError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RequestError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // Check the categories BEFORE converting to string
        let is_timeout = error.is_timeout();
        let is_connection = error.is_connect();

        if error.is_decode() {
            return RequestError::Decode {
                message: error.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        RequestError::Transport {
            message: error.to_string(),
            is_timeout,
            is_connection,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for RequestError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        RequestError::Decode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
