//! Request wrapper for the Meiki server.
//!
//! Every call goes through [`RequestClient::send`], which:
//! - resolves the path against the base URL (WHATWG join semantics)
//! - attaches `Content-Type`, `X-Username` and `X-Token` headers from the
//!   caller's [`Session`] snapshot
//! - sends a JSON body only for `POST` and `PUT`
//! - keeps a cookie store so server cookies ride along on later calls
//! - succeeds on status 200 exactly and decodes the JSON body
//!
//! Any other status becomes [`RequestError::ServerRejected`] carrying the
//! server's message. A call that never completes becomes
//! [`RequestError::Transport`].

pub mod format;

pub use format::format_request_error;
pub use reqwest::Method;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::session::Session;

use common::HttpStatusCode;

use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

pub const USERNAME_HEADER: &str = "X-Username";
pub const TOKEN_HEADER: &str = "X-Token";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Field names tried, in order, when an error body is a JSON object.
const ERROR_MESSAGE_FIELDS: [&str; 2] = ["message", "error"];

/// One request: where, how, and what. Built per call and then dropped.
#[derive(Clone, PartialEq)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub body: Value,
}

impl RequestDescriptor {
    /// Descriptor with the default `{}` body.
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
            body: Value::Object(Map::new()),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, Method::POST)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Only mutating methods send a body.
    pub fn carries_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }
}

// Bodies hold passwords, so only the field names are printed.
impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = match &self.body {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        f.debug_struct("RequestDescriptor")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("body_fields", &fields)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct RequestClient {
    base_url: Url,
    client: Client,
}

impl RequestClient {
    pub fn new(base_url_str: &str) -> Result<Self, RequestError> {
        let base_url = Url::parse(base_url_str)?;
        Self::build(base_url, None)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RequestError> {
        Self::build(config.server_url.clone(), config.request_timeout)
    }

    fn build(base_url: Url, timeout: Option<Duration>) -> Result<Self, RequestError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path the way a browser resolves `new URL(path, base)`.
    pub fn resolve(&self, path: &str) -> Result<Url, RequestError> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request and decode the 200 body into `T`.
    ///
    /// # Errors
    /// - [`RequestError::ServerRejected`] if a response arrived with any status but 200
    /// - [`RequestError::Transport`] if no response arrived
    /// - [`RequestError::Decode`] / [`RequestError::UrlParse`] for bodies or paths that
    ///   could not be handled
    pub async fn send<T: DeserializeOwned>(
        &self,
        session: &Session,
        descriptor: RequestDescriptor,
    ) -> Result<T, RequestError> {
        let url = self.resolve(&descriptor.path)?;
        debug!("{} {}", descriptor.method, url);

        let mut request = self
            .client
            .request(descriptor.method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(USERNAME_HEADER, session.username_header())
            .header(TOKEN_HEADER, session.token_header());

        if descriptor.carries_body() {
            request = request.body(serde_json::to_vec(&descriptor.body)?);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = RequestError::from(e);
                warn!(
                    "{} {} failed ({}): {}",
                    descriptor.method,
                    descriptor.path,
                    error.error_category(),
                    error
                );
                return Err(error);
            }
        };

        let response = ensure_status_ok(response).await?;
        let parsed: T = response.json().await?;

        Ok(parsed)
    }
}

async fn ensure_status_ok(response: Response) -> Result<Response, RequestError> {
    let status = HttpStatusCode(response.status().as_u16());
    if status.is_ok() {
        return Ok(response);
    }

    let body = response.text().await?;
    let message = server_message_from_body(&body)?;
    warn!("Server rejected request: HTTP {status} - {message}");

    Err(RequestError::server_rejected(status, message))
}

/// Turn a JSON error body into the message shown to the user.
///
/// JSON strings are used verbatim; objects yield their `message` (or `error`)
/// field; anything else is shown as compact JSON. A body that is not JSON at all
/// is a decode failure, not a server message.
pub(crate) fn server_message_from_body(body: &str) -> Result<String, RequestError> {
    let payload: Value = serde_json::from_str(body)?;

    let message = match &payload {
        Value::String(message) => message.clone(),
        Value::Object(map) => ERROR_MESSAGE_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| payload.to_string()),
        other => other.to_string(),
    };

    Ok(message)
}
