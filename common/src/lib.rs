//! Shared primitives for the Meiki client workspace.
//!
//! This crate holds the small value types every other crate leans on:
//! error locations, HTTP status categorization and secrets that refuse to
//! show up in logs. It carries no I/O and no business logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): Pure value types
//! - **client-core**: Request wrapper, validation, session and flow logic
//! - **meiki**: Command-line front end wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
