use crate::error::MeikiError;

use client_core::{AuthFlow, Credentials, SessionStore};

pub const LOGGED_OUT_MESSAGE: &str = "Logged out";
pub const NOT_LOGGED_IN_MESSAGE: &str = "Not logged in";

pub async fn login<S: SessionStore>(
    flow: &mut AuthFlow<S>,
    credentials: &Credentials,
) -> Result<String, MeikiError> {
    let session = flow.login(credentials).await?;
    Ok(logged_in_message(session.username_header()))
}

pub async fn logout<S: SessionStore>(flow: &mut AuthFlow<S>) -> Result<String, MeikiError> {
    flow.logout().await?;
    Ok(LOGGED_OUT_MESSAGE.to_string())
}

/// Reads the saved session only; no request is made.
pub fn whoami<S: SessionStore>(flow: &AuthFlow<S>) -> Result<String, MeikiError> {
    let session = flow.session()?;
    if !session.is_authenticated() {
        return Ok(NOT_LOGGED_IN_MESSAGE.to_string());
    }

    match session.username {
        Some(username) => Ok(logged_in_message(&username)),
        None => Ok(NOT_LOGGED_IN_MESSAGE.to_string()),
    }
}

pub fn logged_in_message(username: &str) -> String {
    format!("Logged in as {username}")
}
