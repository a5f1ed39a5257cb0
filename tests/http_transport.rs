mod common;
use common::quiet_logger;

use abs_mcp::errors::ToolErrorKind;
use abs_mcp::services::config::ApiConfig;
use abs_mcp::services::transport::{ApiRequest, HttpTransport, Transport};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/api", server.uri()),
        token: "secret".to_string(),
    }
}

#[tokio::test]
async fn get_returns_body_byte_for_byte() {
    let server = MockServer::start().await;
    let body: &[u8] = b"{\"libraries\": [ {\"id\":\"lib1\"} ]}\n";
    Mock::given(method("GET"))
        .and(path("/api/libraries"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(quiet_logger()).unwrap();
    let got = transport
        .perform(
            &config_for(&server),
            &ApiRequest::get("/libraries"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(got.as_ref(), body);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("content-type").is_none());
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn post_sends_json_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/col1/book"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "id": "li_7" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(quiet_logger()).unwrap();
    let got = transport
        .perform(
            &config_for(&server),
            &ApiRequest::post("/collections/col1/book", Some(json!({ "id": "li_7" }))),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(got.as_ref(), b"{\"ok\":true}");
}

#[tokio::test]
async fn bodyless_post_has_no_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/backups"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(quiet_logger()).unwrap();
    transport
        .perform(
            &config_for(&server),
            &ApiRequest::post("/backups", None),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn error_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/libraries/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Library not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/backups"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(quiet_logger()).unwrap();
    let cancel = CancellationToken::new();

    let err = transport
        .perform(&config_for(&server), &ApiRequest::get("/libraries/missing"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Upstream);
    assert_eq!(err.upstream_status(), Some(404));
    assert_eq!(err.message, "ABS API returned 404 Not Found: Library not found");

    let err = transport
        .perform(&config_for(&server), &ApiRequest::get("/backups"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.upstream_status(), Some(500));
    assert!(err.message.contains("500"));
    assert!(err.message.ends_with("disk full"));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/libraries"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport =
        HttpTransport::with_timeout(quiet_logger(), Duration::from_millis(100)).unwrap();
    let err = transport
        .perform(
            &config_for(&server),
            &ApiRequest::get("/libraries"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Transport);
    assert!(err.message.contains("timed out"), "{}", err.message);
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/libraries"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(quiet_logger()).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = transport
        .perform(&config_for(&server), &ApiRequest::get("/libraries"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Transport);
    assert_eq!(err.message, "call ABS API: request cancelled");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let transport = HttpTransport::new(quiet_logger()).unwrap();
    let config = ApiConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        token: "secret".to_string(),
    };
    let err = transport
        .perform(&config, &ApiRequest::get("/ping"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Transport);
    assert!(err.message.starts_with("call ABS API: "));
}
