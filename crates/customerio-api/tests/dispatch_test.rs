#![allow(clippy::unwrap_used)]
// Integration tests for `Client::dispatch` using wiremock.
//
// One mock server stands in for all three surfaces; each surface gets its own
// path prefix so auth selection still sees distinct base URLs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use customerio_api::{
    ClassifiedError, Client, ClientBuilder, Error, Method, NO_PAYLOAD, StatusCode,
};

const SITE_ID: &str = "site-123";
const TRACKING_KEY: &str = "tracking-key";
const APP_KEY: &str = "app-key";

// ── Helpers ─────────────────────────────────────────────────────────

fn builder(server: &MockServer) -> ClientBuilder {
    let uri = server.uri();
    Client::builder()
        .endpoints(
            format!("{uri}/track"),
            format!("{uri}/app"),
            format!("{uri}/beta"),
        )
        .tracking_key(SITE_ID, TRACKING_KEY)
        .app_key(APP_KEY)
}

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = builder(&server).build().unwrap();
    (server, client)
}

fn basic_header() -> String {
    format!("Basic {}", STANDARD.encode(format!("{SITE_ID}:{TRACKING_KEY}")))
}

async fn only_request(server: &MockServer) -> wiremock::Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

fn header_str<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn put_to_tracking_surface_returns_raw_result() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/track/api/v1/customers/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let url = format!("{}/track/api/v1/customers/42", server.uri());
    let payload = json!({ "email": "bob@example.com", "plan": "pro" });
    let response = client
        .dispatch(Method::PUT, &url, StatusCode::OK, Some(&payload))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "{}");
    assert!(response.trace.is_none());

    let request = only_request(&server).await;
    let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(sent, payload);
    assert_eq!(header_str(&request, "content-type"), Some("application/json"));
    assert_eq!(
        header_str(&request, "content-length"),
        Some(request.body.len().to_string().as_str())
    );
    assert_eq!(header_str(&request, "authorization"), Some(basic_header().as_str()));
    assert_eq!(
        header_str(&request, "user-agent"),
        Some(customerio_api::config::DEFAULT_USER_AGENT)
    );
}

#[tokio::test]
async fn app_and_beta_surfaces_use_bearer() {
    let (server, client) = setup().await;

    Mock::given(header("authorization", format!("Bearer {APP_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(2)
        .mount(&server)
        .await;

    for prefix in ["app", "beta"] {
        let url = format!("{}/{prefix}/v1/anything", server.uri());
        client
            .dispatch(Method::POST, &url, StatusCode::OK, Some(&json!({})))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn get_and_delete_never_carry_a_body() {
    let (server, client) = setup().await;

    Mock::given(path("/track/api/v1/customers/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/track/api/v1/customers/1", server.uri());
    let payload = json!({ "ignored": true });
    for verb in [Method::GET, Method::DELETE] {
        client
            .dispatch(verb, &url, StatusCode::OK, Some(&payload))
            .await
            .unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.body.is_empty(), "{} carried a body", request.method);
        assert!(request.headers.get("content-type").is_none());
    }
}

#[tokio::test]
async fn post_without_payload_sends_json_null() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/track/api/v1/events", server.uri());
    client
        .dispatch(Method::POST, &url, StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap();

    let request = only_request(&server).await;
    assert_eq!(request.body, b"null");
    assert_eq!(header_str(&request, "content-type"), Some("application/json"));
}

#[tokio::test]
async fn custom_user_agent_is_sent() {
    let server = MockServer::start().await;
    let client = builder(&server).user_agent("my-app/2.0").build().unwrap();

    Mock::given(header("user-agent", "my-app/2.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.user_agent(), "my-app/2.0");
    let url = format!("{}/track/auth", server.uri());
    client
        .dispatch(Method::GET, &url, StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap();
}

#[tokio::test]
async fn tracing_attaches_trace_to_success() {
    let server = MockServer::start().await;
    let client = builder(&server).request_tracing().build().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let url = format!("{}/track/auth", server.uri());
    let response = client
        .dispatch(Method::GET, &url, StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap();

    let trace = response.trace.expect("trace should be captured");
    assert_eq!(trace.attempts, 1);
    assert!(trace.total_time >= trace.time_to_headers);
    assert!(trace.remote_addr.is_some());
}

// ── Classified errors ───────────────────────────────────────────────

#[tokio::test]
async fn tracking_401_is_a_generic_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"meta":{"message":"bad creds"}}"#),
        )
        .mount(&server)
        .await;

    let url = format!("{}/track/api/v1/customers/42", server.uri());
    let err = client
        .dispatch(Method::PUT, &url, StatusCode::OK, Some(&json!({})))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    match err {
        Error::Classified(ClassifiedError::Api { status, url: got, body }) => {
            assert_eq!(status, 401);
            assert_eq!(got, url);
            assert_eq!(&body[..], br#"{"meta":{"message":"bad creds"}}"#);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn email_endpoint_errors_are_transactional() {
    let (server, client) = setup().await;

    Mock::given(path("/app/v1/send/email"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "meta": { "error": "bad address" } })),
        )
        .mount(&server)
        .await;

    let url = format!("{}/app/v1/send/email", server.uri());
    let err = client
        .dispatch(Method::POST, &url, StatusCode::OK, Some(&json!({})))
        .await
        .unwrap_err();

    match err {
        Error::Classified(ClassifiedError::Transactional { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "bad address");
        }
        other => panic!("expected Transactional error, got: {other:?}"),
    }
}

#[tokio::test]
async fn any_status_other_than_expected_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let url = format!("{}/track/api/v1/events", server.uri());
    let err = client
        .dispatch(Method::POST, &url, StatusCode::OK, Some(&json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(201));

    let ok = client
        .dispatch(Method::POST, &url, StatusCode::CREATED, Some(&json!({})))
        .await
        .unwrap();
    assert_eq!(ok.status, StatusCode::CREATED);
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/track/auth", server.uri());
    let err = client
        .dispatch(Method::GET, &url, StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
}

// ── Local and transport failures ────────────────────────────────────

#[tokio::test]
async fn serialization_failure_is_not_sent() {
    let (server, client) = setup().await;

    // Non-string map keys cannot be encoded as JSON object keys.
    let payload: BTreeMap<Vec<u8>, u8> = BTreeMap::from([(vec![1, 2], 3)]);
    let url = format!("{}/track/api/v1/customers/1", server.uri());
    let err = client
        .dispatch(Method::PUT, &url, StatusCode::OK, Some(&payload))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)), "got: {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_url_is_rejected_locally() {
    let (_server, client) = setup().await;
    let err = client
        .dispatch(Method::GET, "not a url", StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)), "got: {err:?}");
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    let client = builder(&server)
        .http_client(reqwest::Client::new())
        .http_timeout(Duration::from_millis(100))
        .retry_count(0)
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let url = format!("{}/track/auth", server.uri());
    let err = client
        .dispatch(Method::GET, &url, StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap_err();

    match err {
        Error::Transport(e) => assert!(e.is_timeout(), "expected timeout, got: {e:?}"),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

/// Accepts connections and drops them without answering, counting each one.
async fn hang_up_server() -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(socket);
        }
    });
    (format!("http://{addr}"), accepted)
}

#[tokio::test]
async fn transport_failures_are_retried_then_propagated() {
    let (base, accepted) = hang_up_server().await;
    let client = Client::builder()
        .endpoints(format!("{base}/track"), format!("{base}/app"), format!("{base}/beta"))
        .app_key(APP_KEY)
        .retry_count(2)
        .build()
        .unwrap();

    let err = client
        .dispatch(Method::GET, &format!("{base}/track/auth"), StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn zero_retries_means_one_attempt() {
    let (base, accepted) = hang_up_server().await;
    let client = Client::builder()
        .endpoints(format!("{base}/track"), format!("{base}/app"), format!("{base}/beta"))
        .app_key(APP_KEY)
        .retry_count(0)
        .build()
        .unwrap();

    let err = client
        .dispatch(Method::GET, &format!("{base}/app/x"), StatusCode::OK, NO_PAYLOAD)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_do_not_interfere() {
    let (server, client) = setup().await;

    for i in 0..32 {
        Mock::given(path(format!("/track/api/v1/customers/{i}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": i })))
            .mount(&server)
            .await;
    }

    let tasks = (0..32).map(|i| {
        let client = client.clone();
        let url = format!("{}/track/api/v1/customers/{i}", server.uri());
        tokio::spawn(async move {
            let payload = json!({ "n": i });
            let response = client
                .dispatch(Method::PUT, &url, StatusCode::OK, Some(&payload))
                .await
                .unwrap();
            (i, response.json::<serde_json::Value>().unwrap())
        })
    });

    for result in futures_util::future::join_all(tasks).await {
        let (i, body) = result.unwrap();
        assert_eq!(body, json!({ "id": i }));
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 32);
    for request in requests {
        let id: i64 = request.url.path().rsplit('/').next().unwrap().parse().unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(sent, json!({ "n": id }));
    }
}
