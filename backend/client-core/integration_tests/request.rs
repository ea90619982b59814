use crate::support::{start_server, unreachable_client};

use client_core::config::{ClientConfig, FileConfig, ServerSection};
use client_core::request::Method;
use client_core::{RequestClient, RequestDescriptor, RequestError, Session};

use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: Verifies the success path decodes the 200 body.
#[tokio::test]
async fn given_200_response_when_sending_then_returns_parsed_body() {
    // GIVEN: A server answering 200 with JSON
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alex"})))
        .mount(&server)
        .await;

    // WHEN: Sending
    let result: Value = client
        .send(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap();

    // THEN: The parsed payload comes back
    assert_eq!(result, json!({"username": "alex"}));
}

/// **VALUE**: Verifies auth and content-type headers come from the session snapshot.
///
/// **WHY THIS MATTERS**: The server identifies the user only through these headers.
#[tokio::test]
async fn given_authenticated_session_when_sending_then_attaches_auth_headers() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("content-type", "application/json"))
        .and(header("x-username", "shnoo"))
        .and(header("x-token", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json("Logged out"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new("shnoo", "tok-1");
    let result: Value = client
        .send(&session, RequestDescriptor::post("/auth/logout"))
        .await
        .unwrap();

    assert_eq!(result, json!("Logged out"));
}

/// **VALUE**: Verifies absent session values go out as empty headers.
#[tokio::test]
async fn given_anonymous_session_when_sending_then_auth_headers_are_empty() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let _: Value = client
        .send(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.headers.get("x-username").unwrap().to_str().unwrap(), "");
    assert_eq!(request.headers.get("x-token").unwrap().to_str().unwrap(), "");
}

/// **VALUE**: Verifies POST bodies are JSON-serialized.
#[tokio::test]
async fn given_post_with_body_when_sending_then_body_is_json() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alex", "password": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = RequestDescriptor::post("/login")
        .with_body(json!({"username": "alex", "password": "password"}));
    let result: Value = client.send(&Session::anonymous(), descriptor).await.unwrap();

    assert_eq!(result, json!({"ok": true}));
}

/// **VALUE**: Verifies non-mutating methods never carry a body.
///
/// **BUG THIS CATCHES**: Would catch a GET that ships `{}` (some servers reject that).
#[tokio::test]
async fn given_get_with_body_when_sending_then_body_is_dropped() {
    let (server, client) = start_server().await;
    Mock::given(method("GET"))
        .and(path("/notes/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let descriptor = RequestDescriptor::new("/notes/list", Method::GET)
        .with_body(json!({"ignored": true}));
    let _: Value = client.send(&Session::anonymous(), descriptor).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty(), "GET must not carry a body");
}

/// **VALUE**: Verifies a JSON string error body becomes a server rejection.
#[tokio::test]
async fn given_409_with_string_body_when_sending_then_server_rejected_with_message() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(409).set_body_json("User already exists"))
        .mount(&server)
        .await;

    let result: Result<Value, RequestError> = client
        .send(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await;

    match result {
        Err(RequestError::ServerRejected {
            status, message, ..
        }) => {
            assert_eq!(status.as_u16(), 409);
            assert_eq!(message, "User already exists");
        }
        other => panic!("Expected ServerRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn given_401_with_message_object_when_sending_then_message_extracted() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Password does not match"})),
        )
        .mount(&server)
        .await;

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/login"))
        .await
        .unwrap_err();

    assert_eq!(error.server_message(), Some("Password does not match"));
    assert_eq!(error.status_code(), Some(401));
}

/// **VALUE**: Verifies success means exactly 200, not any 2xx.
#[tokio::test]
async fn given_201_response_when_sending_then_treated_as_rejection() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json("Created"))
        .mount(&server)
        .await;

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap_err();

    assert!(error.is_server_rejected());
    assert_eq!(error.server_message(), Some("Created"));
}

/// **VALUE**: Verifies a refused connection is a transport failure, not a rejection.
#[tokio::test]
async fn given_unreachable_server_when_sending_then_transport_error() {
    let client = unreachable_client();

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap_err();

    match error {
        RequestError::Transport { is_connection, .. } => assert!(is_connection),
        other => panic!("Expected Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn given_200_with_invalid_json_when_sending_then_decode_error() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap_err();

    assert!(matches!(error, RequestError::Decode { .. }), "got {:?}", error);
}

#[tokio::test]
async fn given_500_with_html_body_when_sending_then_decode_error() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap_err();

    assert!(!error.is_server_rejected());
}

/// **VALUE**: Verifies cookies set by the server are sent back on later calls.
#[tokio::test]
async fn given_server_sets_cookie_when_sending_again_then_cookie_included() {
    let (server, client) = start_server().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=abc123; Path=/")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let _: Value = client
        .send(&Session::anonymous(), RequestDescriptor::post("/login"))
        .await
        .unwrap();
    let second: Value = client
        .send(&Session::anonymous(), RequestDescriptor::post("/auth/logout"))
        .await
        .unwrap();

    assert_eq!(second, json!("ok"));
}

/// **VALUE**: Verifies the optional configured timeout is honoured.
#[tokio::test]
async fn given_configured_timeout_when_server_is_slow_then_timeout_transport_error() {
    let (server, _) = start_server().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let file = FileConfig {
        server: ServerSection {
            url: Some(server.uri()),
            request_timeout_secs: Some(1),
        },
        ..FileConfig::default()
    };
    let config = ClientConfig::resolve(file, None, Path::new("/unused")).unwrap();
    let client = RequestClient::from_config(&config).unwrap();

    let error = client
        .send::<Value>(&Session::anonymous(), RequestDescriptor::post("/create"))
        .await
        .unwrap_err();

    match error {
        RequestError::Transport { is_timeout, .. } => assert!(is_timeout),
        other => panic!("Expected timeout, got {:?}", other),
    }
}
