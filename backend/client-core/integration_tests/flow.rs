use crate::support::{
    TEST_PASSWORD, TEST_TOKEN, TEST_USERNAME, anonymous_flow, authenticated_flow, start_server,
    unreachable_client,
};

use client_core::account::{CREATE_ENDPOINT, DELETE_ENDPOINT, LOGIN_ENDPOINT, LOGOUT_ENDPOINT};
use client_core::flow::{ACCOUNT_CREATED_MESSAGE, ACCOUNT_DELETED_MESSAGE};
use client_core::error::SessionError;
use client_core::session::{MemoryStore, TOKEN_KEY, USERNAME_KEY};
use client_core::{
    AuthFlow, Credentials, FlowError, FlowState, Session, SessionContext, SessionStore,
    ValidationError,
};

use common::ErrorLocation;

use std::panic::Location;

use serde_json::json;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new(TEST_USERNAME, TEST_PASSWORD)
}

// ============================================
// CREATE ACCOUNT
// ============================================

/// **VALUE**: Verifies an invalid username never reaches the network.
///
/// **BUG THIS CATCHES**: Would catch validation running after the request.
#[tokio::test]
async fn given_invalid_username_when_creating_account_then_no_request_is_sent() {
    // GIVEN: A server that must not be called
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    // WHEN: Creating with a username containing a space
    let creds = Credentials::new("bad name", TEST_PASSWORD);
    let error = flow.create_account(&creds, TEST_PASSWORD).await.unwrap_err();

    // THEN: Validation error, state and message updated
    assert!(matches!(
        error,
        FlowError::Validation {
            source: ValidationError::InvalidUsername,
            ..
        }
    ));
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
    assert_eq!(
        flow.error_message(),
        Some("Username should not contain any special characters other than '-' and '_'")
    );
}

#[tokio::test]
async fn given_short_password_when_creating_account_then_no_request_is_sent() {
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let creds = Credentials::new(TEST_USERNAME, "abcd");
    flow.create_account(&creds, "abcd").await.unwrap_err();

    assert_eq!(
        flow.error_message(),
        Some("Password should have minimum five characters")
    );
}

#[tokio::test]
async fn given_mismatched_confirmation_when_creating_account_then_no_request_is_sent() {
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    flow.create_account(&credentials(), "somethingelse")
        .await
        .unwrap_err();

    assert_eq!(flow.error_message(), Some("Passwords do not match"));
}

/// **VALUE**: Verifies creation succeeds without logging the user in.
#[tokio::test]
async fn given_200_create_when_creating_account_then_success_message_and_still_anonymous() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(CREATE_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": TEST_USERNAME})))
        .expect(1)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let message = flow.create_account(&credentials(), TEST_PASSWORD).await.unwrap();

    assert_eq!(message, ACCOUNT_CREATED_MESSAGE);
    assert_eq!(flow.state(), FlowState::Anonymous);
    assert_eq!(flow.session().unwrap(), Session::anonymous());
}

#[tokio::test]
async fn given_409_create_when_creating_account_then_error_is_server_text() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(CREATE_ENDPOINT))
        .respond_with(ResponseTemplate::new(409).set_body_json("User already exists"))
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let error = flow
        .create_account(&credentials(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert!(error.is_request_failure());
    assert_eq!(error.user_message(), "User already exists");
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
}

#[tokio::test]
async fn given_unreachable_server_when_creating_account_then_generic_error_message() {
    let mut flow = anonymous_flow(unreachable_client());

    flow.create_account(&credentials(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert_eq!(
        flow.error_message(),
        Some("An error has occurred while creating the account, unable to connect to server")
    );
}

/// **VALUE**: Verifies resubmitting after a transport failure behaves the same way.
#[tokio::test]
async fn given_transport_failure_when_resubmitting_then_same_outcome() {
    let mut flow = anonymous_flow(unreachable_client());

    let first = flow
        .create_account(&credentials(), TEST_PASSWORD)
        .await
        .unwrap_err();
    let second = flow
        .create_account(&credentials(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert_eq!(first.user_message(), second.user_message());
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
}

/// **VALUE**: Verifies a new submission clears the previous error.
#[tokio::test]
async fn given_previous_error_when_submission_succeeds_then_error_cleared() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(CREATE_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    flow.create_account(&credentials(), "nope!").await.unwrap_err();
    assert!(flow.error_message().is_some());

    flow.create_account(&credentials(), TEST_PASSWORD).await.unwrap();

    assert_eq!(flow.error_message(), None);
    assert_eq!(flow.state(), FlowState::Anonymous);
}

// ============================================
// LOGIN
// ============================================

/// **VALUE**: Verifies an invalid username on login never reaches the network.
#[tokio::test]
async fn given_invalid_username_when_logging_in_then_no_request_is_sent() {
    // GIVEN: A server that must not be called
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    // WHEN: Logging in with a username holding '*'
    let error = flow
        .login(&Credentials::new("alex**", TEST_PASSWORD))
        .await
        .unwrap_err();

    // THEN: Rejected locally with the fixed text
    assert!(matches!(
        error,
        FlowError::Validation {
            source: ValidationError::InvalidUsername,
            ..
        }
    ));
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
    assert_eq!(
        flow.error_message(),
        Some("Username should not contain any special characters other than '-' and '_'")
    );
    assert!(flow.session_context().store().is_empty());
}

#[tokio::test]
async fn given_short_password_when_logging_in_then_no_request_is_sent() {
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let error = flow
        .login(&Credentials::new(TEST_USERNAME, "123"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        FlowError::Validation {
            source: ValidationError::PasswordTooShort,
            ..
        }
    ));
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
    assert_eq!(
        flow.error_message(),
        Some("Password should have minimum five characters")
    );
}

/// **VALUE**: Verifies login stores exactly the returned pair.
///
/// **WHY THIS MATTERS**: Every later request identifies the user from these two keys.
#[tokio::test]
async fn given_200_login_when_logging_in_then_session_holds_returned_pair() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": TEST_USERNAME, "token": TEST_TOKEN})),
        )
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let session = flow.login(&credentials()).await.unwrap();

    assert_eq!(session, Session::new(TEST_USERNAME, TEST_TOKEN));
    assert_eq!(flow.state(), FlowState::Authenticated);
    let store = flow.session_context().store();
    assert_eq!(store.get(USERNAME_KEY).unwrap().as_deref(), Some(TEST_USERNAME));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some(TEST_TOKEN));
}

/// Memory store that refuses to write the token.
struct TokenRefusingStore {
    inner: MemoryStore,
}

impl SessionStore for TokenRefusingStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        if key == TOKEN_KEY {
            return Err(SessionError::SerializeError {
                location: ErrorLocation::from(Location::caller()),
                reason: String::from("token write refused"),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.inner.remove(key)
    }
}

/// **VALUE**: Verifies a login whose session write fails leaves the store as it was.
#[tokio::test]
async fn given_session_write_fails_when_logging_in_then_prior_entries_kept() {
    // GIVEN: A successful login response and a store holding a stray username
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": TEST_USERNAME, "token": TEST_TOKEN})),
        )
        .mount(&server)
        .await;
    let mut inner = MemoryStore::new();
    inner.set(USERNAME_KEY, "ghost").unwrap();
    let store = TokenRefusingStore { inner };
    let mut flow = AuthFlow::new(client, SessionContext::new(store)).unwrap();

    // WHEN: Logging in
    let error = flow.login(&credentials()).await.unwrap_err();

    // THEN: Session error reported, stray entry untouched
    assert!(matches!(error, FlowError::Session { .. }));
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
    assert_eq!(flow.error_message(), Some("Unable to access the saved session"));
    let store = flow.session_context().store();
    assert_eq!(store.get(USERNAME_KEY).unwrap().as_deref(), Some("ghost"));
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn given_401_login_when_logging_in_then_session_untouched() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(ResponseTemplate::new(401).set_body_json("Password does not match"))
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    flow.login(&credentials()).await.unwrap_err();

    assert_eq!(flow.error_message(), Some("Password does not match"));
    assert_eq!(flow.state(), FlowState::AnonymousWithError);
    assert!(flow.session_context().store().is_empty());
}

#[tokio::test]
async fn given_authenticated_flow_when_logging_in_then_invalid_transition() {
    let (server, client) = start_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut flow = authenticated_flow(client);

    let error = flow.login(&credentials()).await.unwrap_err();

    assert!(matches!(error, FlowError::InvalidTransition { .. }));
    assert_eq!(flow.state(), FlowState::Authenticated);
    assert_eq!(flow.error_message(), None);
}

// ============================================
// LOGOUT
// ============================================

/// **VALUE**: Verifies a successful logout clears both session keys.
#[tokio::test]
async fn given_200_logout_when_logging_out_then_session_cleared() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_ENDPOINT))
        .and(header("x-username", TEST_USERNAME))
        .and(header("x-token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json("Logged out"))
        .expect(1)
        .mount(&server)
        .await;
    let mut flow = authenticated_flow(client);

    flow.logout().await.unwrap();

    assert_eq!(flow.state(), FlowState::Anonymous);
    assert_eq!(flow.session().unwrap(), Session::anonymous());
    assert!(flow.session_context().store().is_empty());
}

/// **VALUE**: Verifies a failed logout keeps the user logged in.
///
/// **BUG THIS CATCHES**: Would catch clearing the session before the server confirmed.
#[tokio::test]
async fn given_500_logout_when_logging_out_then_session_retained() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_json("Database unavailable"))
        .mount(&server)
        .await;
    let mut flow = authenticated_flow(client);

    let error = flow.logout().await.unwrap_err();

    assert_eq!(error.user_message(), "Database unavailable");
    assert_eq!(flow.state(), FlowState::Authenticated);
    assert_eq!(
        flow.session().unwrap(),
        Session::new(TEST_USERNAME, TEST_TOKEN)
    );
}

#[tokio::test]
async fn given_unreachable_server_when_logging_out_then_session_retained() {
    let mut flow = authenticated_flow(unreachable_client());

    flow.logout().await.unwrap_err();

    assert_eq!(
        flow.error_message(),
        Some("An error has occurred while logging out, unable to connect to server")
    );
    assert!(flow.session().unwrap().is_authenticated());
}

#[tokio::test]
async fn given_anonymous_flow_when_logging_out_then_invalid_transition() {
    let mut flow = anonymous_flow(unreachable_client());

    let error = flow.logout().await.unwrap_err();

    assert_eq!(error.user_message(), "Cannot log out while anonymous");
    assert_eq!(flow.state(), FlowState::Anonymous);
}

// ============================================
// DELETE ACCOUNT
// ============================================

#[tokio::test]
async fn given_200_delete_when_deleting_account_then_success_message() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(DELETE_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json("Account deleted"))
        .expect(1)
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    let message = flow.delete_account(&credentials()).await.unwrap();

    assert_eq!(message, ACCOUNT_DELETED_MESSAGE);
    assert_eq!(flow.state(), FlowState::Anonymous);
}

#[tokio::test]
async fn given_unreachable_server_when_deleting_account_then_generic_error_message() {
    let mut flow = anonymous_flow(unreachable_client());

    flow.delete_account(&credentials()).await.unwrap_err();

    assert_eq!(
        flow.error_message(),
        Some("An error has occurred while deleting the account, unable to connect to server")
    );
}

// ============================================
// ABANDONED SUBMISSIONS
// ============================================

/// **VALUE**: Verifies a dropped login future does not wedge the flow in `Submitting`.
///
/// **BUG THIS CATCHES**: Would catch every later submission failing with an
/// invalid transition after the caller gave up on a slow request.
#[tokio::test]
async fn given_abandoned_login_when_submitting_again_then_flow_recovers() {
    use std::time::Duration;

    // GIVEN: A server that answers the first login too slowly
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": TEST_USERNAME, "token": TEST_TOKEN}))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": TEST_USERNAME, "token": TEST_TOKEN})),
        )
        .mount(&server)
        .await;
    let mut flow = anonymous_flow(client);

    // WHEN: The caller gives up on the first attempt
    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), flow.login(&credentials())).await;
    assert!(abandoned.is_err(), "first login should time out");
    assert_eq!(flow.state(), FlowState::Submitting);

    // THEN: The next submission proceeds normally
    flow.login(&credentials()).await.unwrap();
    assert_eq!(flow.state(), FlowState::Authenticated);
}
