use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Directory Not Found Error: {what} {location}")]
    DirectoryNotFound {
        location: ErrorLocation,
        what: &'static str,
    },

    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}

impl ConfigError {
    /// Text to show the user, without variant prefix or location.
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ReadError { path, source, .. } => {
                format!("Unable to read config file {}: {source}", path.display())
            }
            ConfigError::ParseError { path, reason, .. } => {
                format!("Invalid config file {}: {reason}", path.display())
            }
            ConfigError::DirectoryNotFound { what, .. } => {
                format!("Unable to determine the {what}")
            }
            ConfigError::ValidationError { reason, .. } => reason.clone(),
        }
    }
}
