use crate::support::{TEST_PASSWORD, TEST_TOKEN, TEST_USERNAME, start_server, unreachable_client};

use client_core::account::{
    self, CREATE_ENDPOINT, DELETE_ENDPOINT, LOGIN_ENDPOINT, LOGOUT_ENDPOINT,
};
use client_core::request::format::{ACTION_CREATING_ACCOUNT, ACTION_LOGGING_IN};
use client_core::{Credentials, Session, format_request_error};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new(TEST_USERNAME, TEST_PASSWORD)
}

/// **VALUE**: Verifies account creation posts the credential pair to `/create`.
#[tokio::test]
async fn given_valid_credentials_when_creating_account_then_posts_to_create() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(CREATE_ENDPOINT))
        .and(body_json(json!({"username": TEST_USERNAME, "password": TEST_PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": TEST_USERNAME})))
        .expect(1)
        .mount(&server)
        .await;

    let created = account::create_account(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap();

    assert_eq!(created["username"], TEST_USERNAME);
}

/// **VALUE**: Verifies a duplicate username surfaces the server's own text.
#[tokio::test]
async fn given_existing_username_when_creating_account_then_message_is_server_text() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(CREATE_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "User already exists"})),
        )
        .mount(&server)
        .await;

    let error = account::create_account(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(
        format_request_error(&error, ACTION_CREATING_ACCOUNT),
        "User already exists"
    );
}

/// **VALUE**: Verifies the exact sentence shown when the server cannot be reached.
///
/// **BUG THIS CATCHES**: Would catch leaking transport details into the user message.
#[tokio::test]
async fn given_unreachable_server_when_creating_account_then_generic_message() {
    let client = unreachable_client();

    let error = account::create_account(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(
        format_request_error(&error, ACTION_CREATING_ACCOUNT),
        "An error has occurred while creating the account, unable to connect to server"
    );
}

/// **VALUE**: Verifies the login response decodes into username and token.
#[tokio::test]
async fn given_200_login_when_logging_in_then_returns_username_and_token() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": TEST_USERNAME, "token": TEST_TOKEN})),
        )
        .mount(&server)
        .await;

    let response = account::login(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap();

    assert_eq!(response.username, TEST_USERNAME);
    assert_eq!(response.token.as_str(), TEST_TOKEN);
}

#[tokio::test]
async fn given_wrong_password_when_logging_in_then_message_is_server_text() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(ResponseTemplate::new(401).set_body_json("Password does not match"))
        .mount(&server)
        .await;

    let error = account::login(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(
        format_request_error(&error, ACTION_LOGGING_IN),
        "Password does not match"
    );
}

/// **VALUE**: Verifies a 200 login body missing the token is a decode failure.
#[tokio::test]
async fn given_login_body_without_token_when_logging_in_then_decode_error() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": TEST_USERNAME})))
        .mount(&server)
        .await;

    let error = account::login(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(error.error_category(), "decode");
}

/// **VALUE**: Verifies logout sends `{}` with the session headers.
#[tokio::test]
async fn given_session_when_logging_out_then_posts_empty_body_with_headers() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_ENDPOINT))
        .and(header("x-username", TEST_USERNAME))
        .and(header("x-token", TEST_TOKEN))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json("Logged out"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(TEST_USERNAME, TEST_TOKEN);
    account::logout(&client, &session).await.unwrap();
}

#[tokio::test]
async fn given_valid_credentials_when_deleting_account_then_posts_to_delete() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path(DELETE_ENDPOINT))
        .and(body_json(json!({"username": TEST_USERNAME, "password": TEST_PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json("Account deleted"))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = account::delete_account(&client, &Session::anonymous(), &credentials())
        .await
        .unwrap();

    assert_eq!(deleted, json!("Account deleted"));
}
