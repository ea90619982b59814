//! Local input rejections.
//!
//! Unlike the other error types in this crate these carry no location: their
//! `Display` is the exact text shown to the user.

use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Username should not contain any special characters other than '-' and '_'")]
    InvalidUsername,

    #[error("Password should have minimum five characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}
