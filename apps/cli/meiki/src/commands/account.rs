use crate::error::MeikiError;

use client_core::{AuthFlow, Credentials, SessionStore};

use log::info;

pub async fn create<S: SessionStore>(
    flow: &mut AuthFlow<S>,
    credentials: &Credentials,
    confirmation: &str,
) -> Result<String, MeikiError> {
    let message = flow.create_account(credentials, confirmation).await?;
    info!("Created account {}", credentials.username);
    Ok(message.to_string())
}

pub async fn delete<S: SessionStore>(
    flow: &mut AuthFlow<S>,
    credentials: &Credentials,
) -> Result<String, MeikiError> {
    let message = flow.delete_account(credentials).await?;
    info!("Deleted account {}", credentials.username);
    Ok(message.to_string())
}
