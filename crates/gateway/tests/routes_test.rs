#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Utility server routes over a real socket.

use {
    leadflow_gateway::{UtilsState, build_app},
    serde_json::{Value, json},
    std::{net::SocketAddr, sync::Arc},
    tokio::net::TcpListener,
};

async fn start_server(state: UtilsState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(Arc::new(state));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn default_server() -> SocketAddr {
    start_server(UtilsState::new(
        "Hairy Utils",
        Some("https://utils.example".into()),
    ))
    .await
}

#[tokio::test]
async fn status_reports_identity() {
    let addr = default_server().await;
    let resp = reqwest::get(format!("http://{addr}/status")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "Hairy Utils");
    assert_eq!(body["url"], "https://utils.example");
    let time = body["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    assert!(time.ends_with('Z'));
}

#[tokio::test]
async fn status_omits_url_when_unset() {
    let addr = start_server(UtilsState::new("leadflow", None)).await;
    let body: Value = reqwest::get(format!("http://{addr}/status"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.get("url").is_none());
}

#[tokio::test]
async fn echo_returns_headers_and_body() {
    let addr = default_server().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .header("x-probe", "abc")
        .json(&json!({"hello": "world", "n": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["headers"]["x-probe"], "abc");
    assert_eq!(body["headers"]["content-type"], "application/json");
    assert_eq!(body["body"], json!({"hello": "world", "n": 1}));
    assert!(body["receivedAt"].as_str().is_some());
}

#[tokio::test]
async fn mock_webhook_wraps_payload_on_both_paths() {
    let addr = default_server().await;
    let client = reqwest::Client::new();
    for path in ["mock-webhook", "syncee/mock-webhook"] {
        let body: Value = client
            .post(format!("http://{addr}/{path}"))
            .json(&json!({"sku": "COL-01"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            body,
            json!({"ok": true, "event": "syncee.mock", "payload": {"sku": "COL-01"}})
        );
    }
}

#[tokio::test]
async fn mock_webhook_empty_body_is_empty_object() {
    let addr = default_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("http://{addr}/syncee/mock-webhook"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["payload"], json!({}));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let addr = default_server().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    use {
        axum::{body::Body, http::Request},
        tower::ServiceExt,
    };

    let app = build_app(Arc::new(UtilsState::new("leadflow", None)));
    let big = format!("\"{}\"", "a".repeat(3 * 1024 * 1024));
    let resp = app
        .oneshot(
            Request::post("/echo")
                .header("content-type", "application/json")
                .body(Body::from(big))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
}

#[tokio::test]
async fn healthz_is_plain_ok() {
    let addr = default_server().await;
    let resp = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let addr = default_server().await;
    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/status"))
        .header("origin", "https://dashboard.example")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[cfg(feature = "prometheus")]
#[tokio::test]
async fn metrics_unavailable_without_recorder() {
    let addr = default_server().await;
    let resp = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
    assert_eq!(resp.status(), 503);
}
