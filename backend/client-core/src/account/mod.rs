//! Account endpoints of the Meiki server.
//!
//! Each operation is a fixed endpoint + method pairing on top of
//! [`RequestClient::send`]. Errors propagate unmodified; formatting them for
//! display is the caller's job. None of these functions touch the session
//! store.

use crate::error::RequestError;
use crate::request::{RequestClient, RequestDescriptor};
use crate::session::Session;
use crate::validation::Credentials;

use common::RedactedSecret;

use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

pub const CREATE_ENDPOINT: &str = "/create";
pub const LOGIN_ENDPOINT: &str = "/login";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const DELETE_ENDPOINT: &str = "/delete";

/// 200 payload of the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: RedactedSecret,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<RedactedSecret, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(RedactedSecret::new)
}

fn credentials_body(credentials: &Credentials) -> Value {
    json!({
        "username": credentials.username,
        "password": credentials.password.as_str(),
    })
}

/// `POST /create` with `{username, password}`.
pub async fn create_account(
    client: &RequestClient,
    session: &Session,
    credentials: &Credentials,
) -> Result<Value, RequestError> {
    let descriptor = RequestDescriptor::post(CREATE_ENDPOINT).with_body(credentials_body(credentials));
    let created = client.send(session, descriptor).await?;
    info!("Account created for {}", credentials.username);
    Ok(created)
}

/// `POST /login` with `{username, password}`; returns the issued token.
pub async fn login(
    client: &RequestClient,
    session: &Session,
    credentials: &Credentials,
) -> Result<LoginResponse, RequestError> {
    let descriptor = RequestDescriptor::post(LOGIN_ENDPOINT).with_body(credentials_body(credentials));
    let response: LoginResponse = client.send(session, descriptor).await?;
    info!(
        "Logged in as {} (token {} chars)",
        response.username,
        response.token.char_count()
    );
    Ok(response)
}

/// `POST /auth/logout` with an empty object body.
pub async fn logout(client: &RequestClient, session: &Session) -> Result<Value, RequestError> {
    let response = client
        .send(session, RequestDescriptor::post(LOGOUT_ENDPOINT))
        .await?;
    info!("Logged out {}", session.username_header());
    Ok(response)
}

/// `POST /delete` with `{username, password}`. Removes the account and its tokens.
pub async fn delete_account(
    client: &RequestClient,
    session: &Session,
    credentials: &Credentials,
) -> Result<Value, RequestError> {
    let descriptor = RequestDescriptor::post(DELETE_ENDPOINT).with_body(credentials_body(credentials));
    let deleted = client.send(session, descriptor).await?;
    info!("Account deleted for {}", credentials.username);
    Ok(deleted)
}
