//! Route handlers.

use {
    axum::{
        Json,
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
    },
    chrono::{SecondsFormat, Utc},
    serde_json::{Map, Value, json},
    std::sync::Arc,
    tracing::debug,
};

#[cfg(feature = "metrics")]
use leadflow_metrics::{counter, http as http_metrics, labels};

use crate::state::UtilsState;

#[cfg(feature = "metrics")]
fn count(endpoint: &'static str) {
    counter!(http_metrics::REQUESTS_TOTAL, labels::ENDPOINT => endpoint).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn count(_endpoint: &'static str) {}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Empty bodies read as `{}`; anything else must be JSON.
fn parse_body(body: &Bytes) -> Result<Value, (StatusCode, Json<Value>)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": format!("invalid JSON body: {e}") })),
        )
    })
}

fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut out = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        out.insert(name.as_str().to_owned(), Value::String(joined));
    }
    Value::Object(out)
}

pub async fn status_handler(State(state): State<Arc<UtilsState>>) -> impl IntoResponse {
    count("status");
    let mut body = json!({
        "ok": true,
        "service": state.service_name,
        "time": now(),
    });
    if let Some(url) = &state.public_url {
        body["url"] = json!(url);
    }
    Json(body)
}

pub async fn echo_handler(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    count("echo");
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection.into_response(),
    };
    debug!(headers = headers.len(), "echo request");
    Json(json!({
        "ok": true,
        "receivedAt": now(),
        "headers": headers_to_json(&headers),
        "body": body,
    }))
    .into_response()
}

pub async fn mock_webhook_handler(body: Bytes) -> impl IntoResponse {
    count("mock_webhook");
    let payload = match parse_body(&body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection.into_response(),
    };
    debug!("mock webhook received");
    Json(json!({
        "ok": true,
        "event": "syncee.mock",
        "payload": payload,
    }))
    .into_response()
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// Prometheus scrape endpoint.
#[cfg(feature = "prometheus")]
pub async fn prometheus_metrics_handler(State(state): State<Arc<UtilsState>>) -> impl IntoResponse {
    use axum::http::header;

    match state.metrics_handle.as_ref() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not enabled".to_owned(),
        ),
    }
}
