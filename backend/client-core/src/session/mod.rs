//! Session context: the persisted username/token pair.
//!
//! The request wrapper only ever reads a [`Session`] snapshot to build its auth
//! headers. Writing (populate on login, clear on logout) belongs to the flow
//! layer through [`SessionContext`]. Nothing here is global; callers own the
//! context and pass snapshots down explicitly.

pub mod store;

pub use store::{FileStore, MemoryStore, SessionStore};

use crate::error::SessionError;

use common::RedactedSecret;

use log::{debug, info, warn};

/// Store key holding the logged-in username.
pub const USERNAME_KEY: &str = "username";
/// Store key holding the session token.
pub const TOKEN_KEY: &str = "token";

/// Snapshot of the current session. Both fields are absent before login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
    pub token: Option<RedactedSecret>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(username: impl Into<String>, token: impl Into<RedactedSecret>) -> Self {
        Self {
            username: Some(username.into()),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_empty())
    }

    /// Value for the `X-Username` header; empty when absent.
    pub fn username_header(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    /// Value for the `X-Token` header; empty when absent.
    pub fn token_header(&self) -> &str {
        self.token.as_ref().map(RedactedSecret::as_str).unwrap_or_default()
    }
}

/// Owns the backing store and is the only writer of session entries.
#[derive(Debug)]
pub struct SessionContext<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the current session from the store.
    pub fn current(&self) -> Result<Session, SessionError> {
        let username = self.store.get(USERNAME_KEY)?;
        let token = self.store.get(TOKEN_KEY)?.map(RedactedSecret::new);
        Ok(Session { username, token })
    }

    /// Persist a freshly issued username/token pair.
    ///
    /// On failure the entries are put back the way they were before the call.
    pub fn populate(&mut self, username: &str, token: &RedactedSecret) -> Result<(), SessionError> {
        let previous_username = self.store.get(USERNAME_KEY)?;
        let previous_token = self.store.get(TOKEN_KEY)?;

        let written = self
            .store
            .set(USERNAME_KEY, username)
            .and_then(|()| self.store.set(TOKEN_KEY, token.as_str()));

        if let Err(e) = written {
            self.restore(USERNAME_KEY, previous_username.as_deref());
            self.restore(TOKEN_KEY, previous_token.as_deref());
            return Err(e);
        }

        info!("Session populated for user {username}");
        Ok(())
    }

    /// Remove both entries, token first.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.remove_all(&[TOKEN_KEY, USERNAME_KEY])?;
        debug!("Session cleared");
        Ok(())
    }

    // Best effort: the caller already has the error to report.
    fn restore(&mut self, key: &str, value: Option<&str>) {
        let restored = match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(e) = restored {
            warn!("Failed to restore session entry '{key}': {e}");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
