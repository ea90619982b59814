//! Shared helpers for integration tests.
//!
//! - Starting a mock Meiki server and a client pointed at it
//! - Producing a base URL nothing is listening on (connection refused)
//! - Building flows over an in-memory session store

use client_core::session::MemoryStore;
use client_core::{AuthFlow, RequestClient, SessionContext};

use common::RedactedSecret;

use std::net::TcpListener;

use wiremock::MockServer;

pub const TEST_USERNAME: &str = "shnoo";
pub const TEST_PASSWORD: &str = "thisisveryunsafe";
pub const TEST_TOKEN: &str = "5f0c6a44-2a7e-4b8e-9d7e-1f1b2d3c4e5f";

/// Start a mock server and a client whose base URL is the server's URI.
pub async fn start_server() -> (MockServer, RequestClient) {
    let server = MockServer::start().await;
    let client = RequestClient::new(&server.uri()).expect("Failed to build client");
    (server, client)
}

/// A local URL with nothing listening behind it.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe socket");
    let port = listener
        .local_addr()
        .expect("Failed to read probe address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn unreachable_client() -> RequestClient {
    RequestClient::new(&unreachable_base_url()).expect("Failed to build client")
}

pub fn anonymous_flow(client: RequestClient) -> AuthFlow<MemoryStore> {
    AuthFlow::new(client, SessionContext::new(MemoryStore::new())).expect("Failed to build flow")
}

/// Flow whose store already holds `TEST_USERNAME` / `TEST_TOKEN`.
pub fn authenticated_flow(client: RequestClient) -> AuthFlow<MemoryStore> {
    let mut context = SessionContext::new(MemoryStore::new());
    context
        .populate(TEST_USERNAME, &RedactedSecret::new(TEST_TOKEN))
        .expect("Failed to seed session");
    AuthFlow::new(client, context).expect("Failed to build flow")
}
