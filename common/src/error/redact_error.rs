use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when something tries to write a secret out through serde.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Secret Serialization Refused: {message} {location}")]
    SerializationRefused {
        message: String,
        location: ErrorLocation,
    },
}
