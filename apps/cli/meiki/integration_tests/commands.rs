use meiki::cli::{Command, CredentialArgs};
use meiki::commands::execute;
use meiki::commands::session::{LOGGED_OUT_MESSAGE, NOT_LOGGED_IN_MESSAGE};

use client_core::session::FileStore;
use client_core::{AuthFlow, RequestClient, SessionContext};

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for CLI commands driving client-core against a mock server.
// Each `execute` call stands in for one process invocation: the flow is rebuilt
// from the session file every time.
// ============================================================================

const USERNAME: &str = "alex";
const PASSWORD: &str = "password";
const TOKEN: &str = "c0ffee-token";

fn credentials() -> CredentialArgs {
    CredentialArgs {
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
    }
}

fn flow_for(server_uri: &str, session_file: &Path) -> AuthFlow<FileStore> {
    let client = RequestClient::new(server_uri).expect("Failed to build client");
    let store = FileStore::new(session_file);
    AuthFlow::new(client, SessionContext::new(store)).expect("Failed to build flow")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": USERNAME, "token": TOKEN})),
        )
        .mount(server)
        .await;
}

/// **VALUE**: Tests the full login → whoami → logout → whoami sequence across invocations.
///
/// **WHY THIS MATTERS**: The CLI has no long-lived process; the session file is the
/// only thing carrying the login from one command to the next.
///
/// **BUG THIS CATCHES**: Would catch the session not being persisted, or logout
/// forgetting to clear the file.
#[tokio::test]
async fn given_login_when_running_later_commands_then_session_persists_until_logout() {
    // GIVEN: A server accepting login and logout, and an empty session file location
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("x-username", USERNAME))
        .and(header("x-token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json("Logged out"))
        .expect(1)
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let session_file = data_dir.path().join("session.json");

    // WHEN: Logging in
    let mut flow = flow_for(&server.uri(), &session_file);
    let output = execute(&mut flow, Command::Login { credentials: credentials() })
        .await
        .unwrap();

    // THEN: Confirmation names the user, and a fresh invocation sees the session
    assert_eq!(output, "Logged in as alex");
    let mut flow = flow_for(&server.uri(), &session_file);
    assert_eq!(
        execute(&mut flow, Command::Whoami).await.unwrap(),
        "Logged in as alex"
    );

    // WHEN: Logging out in another invocation
    let mut flow = flow_for(&server.uri(), &session_file);
    let output = execute(&mut flow, Command::Logout).await.unwrap();

    // THEN: Session is gone for the next invocation
    assert_eq!(output, LOGGED_OUT_MESSAGE);
    let mut flow = flow_for(&server.uri(), &session_file);
    assert_eq!(
        execute(&mut flow, Command::Whoami).await.unwrap(),
        NOT_LOGGED_IN_MESSAGE
    );
}

#[tokio::test]
async fn given_create_command_when_server_accepts_then_prints_created_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": USERNAME})))
        .expect(1)
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut flow = flow_for(&server.uri(), &data_dir.path().join("session.json"));

    let output = execute(
        &mut flow,
        Command::Create {
            credentials: credentials(),
            confirm_password: PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, "Your account has successfully been created");
}

/// **VALUE**: Verifies the CLI surfaces the server's own rejection text.
#[tokio::test]
async fn given_create_command_when_user_exists_then_error_is_server_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(409).set_body_json("User already exists"))
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut flow = flow_for(&server.uri(), &data_dir.path().join("session.json"));

    let err = execute(
        &mut flow,
        Command::Create {
            credentials: credentials(),
            confirm_password: PASSWORD.to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "User already exists");
}

#[tokio::test]
async fn given_logout_command_when_not_logged_in_then_invalid_transition_message() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let mut flow = flow_for(&server.uri(), &data_dir.path().join("session.json"));

    let err = execute(&mut flow, Command::Logout).await.unwrap_err();

    assert_eq!(err.user_message(), "Cannot log out while anonymous");
}

/// **VALUE**: Verifies a failed logout leaves the saved session on disk.
#[tokio::test]
async fn given_logout_rejected_when_running_whoami_then_still_logged_in() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json("Database unavailable"))
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let session_file = data_dir.path().join("session.json");

    let mut flow = flow_for(&server.uri(), &session_file);
    execute(&mut flow, Command::Login { credentials: credentials() })
        .await
        .unwrap();

    let mut flow = flow_for(&server.uri(), &session_file);
    let err = execute(&mut flow, Command::Logout).await.unwrap_err();
    assert_eq!(err.user_message(), "Database unavailable");

    let mut flow = flow_for(&server.uri(), &session_file);
    assert_eq!(
        execute(&mut flow, Command::Whoami).await.unwrap(),
        "Logged in as alex"
    );
}

#[tokio::test]
async fn given_delete_command_when_server_accepts_then_prints_deleted_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json("Account deleted"))
        .expect(1)
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut flow = flow_for(&server.uri(), &data_dir.path().join("session.json"));

    let output = execute(&mut flow, Command::Delete { credentials: credentials() })
        .await
        .unwrap();

    assert_eq!(output, "Your account has successfully been deleted");
}
