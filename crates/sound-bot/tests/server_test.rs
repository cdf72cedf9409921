//! HTTP server tests: webhook sink and operational endpoints.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use sound_bot::auth::AuthGate;
use sound_bot::catalog::SoundCatalog;
use sound_bot::dispatch::Dispatcher;
use sound_bot::metrics::Metrics;
use sound_bot::server::{create_router, AppState};
use std::fs;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;
use usage_store::UsageStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:TEST";
const WEBHOOK_PATH: &str = "/123456:TEST";

async fn test_router() -> (axum::Router, MockServer, tempfile::TempDir) {
    let server = MockServer::start().await;

    let assets = tempfile::tempdir().unwrap();
    fs::write(assets.path().join("boom.mp3"), b"bytes").unwrap();
    let catalog = Arc::new(SoundCatalog::scan(assets.path()).unwrap());

    let client = telegram_client::TelegramClient::new(server.uri(), TOKEN).unwrap();
    let dispatcher = Arc::new(Dispatcher::new(
        client,
        UsageStore::in_memory().unwrap(),
        catalog,
        AuthGate::new(vec![]),
        "soundbot",
    ));

    let mut metrics = Metrics::new();
    metrics.mark_startup();
    let state = AppState::new(
        dispatcher,
        Arc::new(RwLock::new(metrics)),
        TOKEN,
        "https://bot.example.com/123456:TEST",
    );

    (create_router(state), server, assets)
}

fn post_webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_status_endpoint() {
    let (router, _server, _assets) = test_router().await;

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["webhook_url"], "https://bot.example.com/123456:TEST");
}

#[tokio::test]
async fn test_webhook_rejects_malformed_payload() {
    let (router, _server, _assets) = test_router().await;

    let response = router.oneshot(post_webhook("this is not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_webhook_processes_update_and_records_metrics() {
    let (router, server, _assets) = test_router().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendAudio", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": { "message_id": 42, "chat": { "id": 100 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{}/deleteMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": true
        })))
        .mount(&server)
        .await;

    let update = serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "from": { "id": 9, "first_name": "Tester" },
            "chat": { "id": 100 },
            "text": "/boom"
        }
    });

    let response = router
        .clone()
        .oneshot(post_webhook(&update.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");

    // The transport-boundary counters saw the raw command
    let response = router
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["startup_count"], 1);
    assert_eq!(json["command_metrics"]["/boom"], 1);
    assert_eq!(json["total_commands"], 1);
    assert_eq!(json["most_frequent_command"], "/boom");
}

#[tokio::test]
async fn test_webhook_wrong_token_is_not_found() {
    let (router, _server, _assets) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/wrong-token")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_message_is_acknowledged() {
    let (router, _server, _assets) = test_router().await;

    let response = router
        .oneshot(post_webhook(r#"{"update_id": 7}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
