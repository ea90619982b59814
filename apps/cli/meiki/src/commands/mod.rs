//! Command handlers. Each returns the line to print on success.

pub mod account;
pub mod session;

use crate::cli::{Command, CredentialArgs};
use crate::error::MeikiError;

use client_core::{AuthFlow, Credentials, SessionStore};

use log::debug;

/// Run one parsed command against the flow.
pub async fn execute<S: SessionStore>(
    flow: &mut AuthFlow<S>,
    command: Command,
) -> Result<String, MeikiError> {
    debug!("Executing command in state: {}", flow.state());

    match command {
        Command::Create {
            credentials,
            confirm_password,
        } => account::create(flow, &credentials.into_credentials(), &confirm_password).await,
        Command::Login { credentials } => {
            session::login(flow, &credentials.into_credentials()).await
        }
        Command::Logout => session::logout(flow).await,
        Command::Whoami => session::whoami(flow),
        Command::Delete { credentials } => {
            account::delete(flow, &credentials.into_credentials()).await
        }
    }
}

impl CredentialArgs {
    pub fn into_credentials(self) -> Credentials {
        Credentials::new(self.username, self.password)
    }
}
