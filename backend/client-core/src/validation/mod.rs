//! Client-side credential rules.
//!
//! Checked BEFORE any request is built. Rules run in a fixed order and only the
//! first failure is reported:
//! 1. username characters
//! 2. password length
//! 3. password confirmation (account creation only)

use crate::error::ValidationError;

use common::RedactedSecret;

use std::sync::OnceLock;

use regex::Regex;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 5;

const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_REGEX.get_or_init(|| Regex::new(USERNAME_PATTERN).expect("valid regex pattern"))
}

/// Username/password pair as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: RedactedSecret,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<RedactedSecret>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Non-empty and only `[A-Za-z0-9_-]`.
pub fn is_valid_username(username: &str) -> bool {
    username_regex().is_match(username)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

/// Rules 1 and 2, shared by login and account creation.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if !is_valid_username(&credentials.username) {
        return Err(ValidationError::InvalidUsername);
    }

    if !is_valid_password(credentials.password.as_str()) {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Rules 1 to 3 for account creation.
pub fn validate_new_account(
    credentials: &Credentials,
    confirmation: &str,
) -> Result<(), ValidationError> {
    validate_credentials(credentials)?;

    if credentials.password.as_str() != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}
