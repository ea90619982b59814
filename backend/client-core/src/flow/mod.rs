//! Login / create-account / logout state machine.
//!
//! ```text
//! Anonymous ──submit──▶ Submitting ──200──▶ Authenticated
//!     ▲                     │                    │
//!     │                  failure              logout
//!     │                     ▼                    ▼
//!     │            AnonymousWithError        LoggingOut ──failure──▶ Authenticated
//!     └──────────────────────────────────────────┘ 200
//! ```
//!
//! Validation always completes before a request is built, and a rejected
//! submission never reaches the network. The session is written only after a
//! 200 login (populate) or a 200 logout (clear); every failure path leaves it as
//! it was. Operations take `&mut self`, so a flow has at most one request in
//! flight.

use crate::account::{self, LoginResponse};
use crate::error::{FlowError, RequestError};
use crate::request::format::{
    ACTION_CREATING_ACCOUNT, ACTION_DELETING_ACCOUNT, ACTION_LOGGING_IN, ACTION_LOGGING_OUT,
};
use crate::request::{RequestClient, format_request_error};
use crate::session::{Session, SessionContext, SessionStore};
use crate::validation::{Credentials, validate_credentials, validate_new_account};

use std::fmt;

use log::{debug, warn};

pub const ACCOUNT_CREATED_MESSAGE: &str = "Your account has successfully been created";
pub const ACCOUNT_DELETED_MESSAGE: &str = "Your account has successfully been deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Anonymous,
    Submitting,
    Authenticated,
    AnonymousWithError,
    LoggingOut,
}

impl FlowState {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, FlowState::Anonymous | FlowState::AnonymousWithError)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, FlowState::Submitting | FlowState::LoggingOut)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Anonymous => "anonymous",
            FlowState::Submitting => "submitting",
            FlowState::Authenticated => "authenticated",
            FlowState::AnonymousWithError => "anonymous with error",
            FlowState::LoggingOut => "logging out",
        };
        write!(f, "{name}")
    }
}

pub struct AuthFlow<S: SessionStore> {
    client: RequestClient,
    session: SessionContext<S>,
    state: FlowState,
    error_message: Option<String>,
}

impl<S: SessionStore> AuthFlow<S> {
    /// Starts `Authenticated` when the store already holds a token.
    pub fn new(client: RequestClient, session: SessionContext<S>) -> Result<Self, FlowError> {
        let current = session.current().map_err(FlowError::session)?;
        let state = if current.is_authenticated() {
            FlowState::Authenticated
        } else {
            FlowState::Anonymous
        };
        debug!("Auth flow starting in state: {state}");

        Ok(Self {
            client,
            session,
            state,
            error_message: None,
        })
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Last user-visible error, cleared when the next submission starts.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn session(&self) -> Result<Session, FlowError> {
        self.session.current().map_err(FlowError::session)
    }

    pub fn session_context(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// Validate, then `POST /create`. Never logs the user in.
    pub async fn create_account(
        &mut self,
        credentials: &Credentials,
        confirmation: &str,
    ) -> Result<&'static str, FlowError> {
        self.begin_anonymous_submission("create an account")?;

        if let Err(e) = validate_new_account(credentials, confirmation) {
            return Err(self.fail(FlowError::validation(e), FlowState::AnonymousWithError));
        }

        self.state = FlowState::Submitting;
        let snapshot = self.snapshot(FlowState::AnonymousWithError)?;

        match account::create_account(&self.client, &snapshot, credentials).await {
            Ok(_) => {
                self.state = FlowState::Anonymous;
                Ok(ACCOUNT_CREATED_MESSAGE)
            }
            Err(e) => Err(self.fail_request(e, ACTION_CREATING_ACCOUNT, FlowState::AnonymousWithError)),
        }
    }

    /// Validate, then `POST /login`; on 200 the returned pair becomes the session.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, FlowError> {
        self.begin_anonymous_submission("log in")?;

        if let Err(e) = validate_credentials(credentials) {
            return Err(self.fail(FlowError::validation(e), FlowState::AnonymousWithError));
        }

        self.state = FlowState::Submitting;
        let snapshot = self.snapshot(FlowState::AnonymousWithError)?;

        let LoginResponse { username, token } =
            match account::login(&self.client, &snapshot, credentials).await {
                Ok(response) => response,
                Err(e) => {
                    return Err(self.fail_request(e, ACTION_LOGGING_IN, FlowState::AnonymousWithError));
                }
            };

        if let Err(e) = self.session.populate(&username, &token) {
            return Err(self.fail(FlowError::session(e), FlowState::AnonymousWithError));
        }

        self.state = FlowState::Authenticated;
        Ok(Session::new(username, token))
    }

    /// `POST /auth/logout`; on 200 the session is cleared.
    pub async fn logout(&mut self) -> Result<(), FlowError> {
        self.settle_abandoned();
        if self.state != FlowState::Authenticated {
            return Err(FlowError::invalid_transition("log out", self.state));
        }
        self.error_message = None;

        self.state = FlowState::LoggingOut;
        let snapshot = self.snapshot(FlowState::Authenticated)?;

        if let Err(e) = account::logout(&self.client, &snapshot).await {
            return Err(self.fail_request(e, ACTION_LOGGING_OUT, FlowState::Authenticated));
        }

        if let Err(e) = self.session.clear() {
            // The token goes first, so a partial clear already ends the session
            let next = match self.session.current() {
                Ok(session) if !session.is_authenticated() => FlowState::Anonymous,
                _ => FlowState::Authenticated,
            };
            return Err(self.fail(FlowError::session(e), next));
        }

        self.state = FlowState::Anonymous;
        Ok(())
    }

    /// Validate, then `POST /delete`.
    pub async fn delete_account(
        &mut self,
        credentials: &Credentials,
    ) -> Result<&'static str, FlowError> {
        self.begin_anonymous_submission("delete an account")?;

        if let Err(e) = validate_credentials(credentials) {
            return Err(self.fail(FlowError::validation(e), FlowState::AnonymousWithError));
        }

        self.state = FlowState::Submitting;
        let snapshot = self.snapshot(FlowState::AnonymousWithError)?;

        match account::delete_account(&self.client, &snapshot, credentials).await {
            Ok(_) => {
                self.state = FlowState::Anonymous;
                Ok(ACCOUNT_DELETED_MESSAGE)
            }
            Err(e) => Err(self.fail_request(e, ACTION_DELETING_ACCOUNT, FlowState::AnonymousWithError)),
        }
    }

    /// A dropped in-flight future leaves `Submitting`/`LoggingOut` behind; roll
    /// those back to the state the submission started from.
    fn settle_abandoned(&mut self) {
        match self.state {
            FlowState::Submitting => self.state = FlowState::Anonymous,
            FlowState::LoggingOut => self.state = FlowState::Authenticated,
            _ => {}
        }
    }

    #[track_caller]
    fn begin_anonymous_submission(&mut self, action: &'static str) -> Result<(), FlowError> {
        self.settle_abandoned();
        if !self.state.is_anonymous() {
            return Err(FlowError::invalid_transition(action, self.state));
        }
        self.error_message = None;
        Ok(())
    }

    fn snapshot(&mut self, on_failure: FlowState) -> Result<Session, FlowError> {
        match self.session.current() {
            Ok(session) => Ok(session),
            Err(e) => Err(self.fail(FlowError::session(e), on_failure)),
        }
    }

    fn fail_request(&mut self, error: RequestError, action: &str, next: FlowState) -> FlowError {
        let message = format_request_error(&error, action);
        self.fail(FlowError::request(message, error), next)
    }

    fn fail(&mut self, error: FlowError, next: FlowState) -> FlowError {
        warn!("Auth flow {} -> {}: {}", self.state, next, error);
        self.state = next;
        self.error_message = Some(error.user_message());
        error
    }
}
