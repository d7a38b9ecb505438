#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Webhook transports against a mock server.

use {
    leadflow_channels::{
        ChannelConfig, ChannelTransport, DeliveryOutcome, DeliveryPayload, Embed, EmbedField,
        Envelope, FailureReason,
    },
    leadflow_webhook::{AutomationWebhookTransport, EmbedWebhookTransport, IntegrationPing},
    mockito::Matcher,
    serde_json::json,
};

const TS: &str = "2025-03-01T10:00:00.000Z";

fn embed() -> DeliveryPayload {
    DeliveryPayload::Embed(Embed {
        title: "💰 Conversion!".into(),
        description: "Ana M. bought Cama Ortopédica".into(),
        color: 0x00ff00,
        fields: vec![
            EmbedField::inline("Product", "Cama Ortopédica"),
            EmbedField::inline("Revenue", "€49.90"),
        ],
        timestamp: TS.into(),
    })
}

fn envelope() -> DeliveryPayload {
    DeliveryPayload::Envelope(Envelope {
        event: "new_lead".into(),
        data: json!({"leadId": "L1", "name": "María G.", "chatId": "C1"}),
        timestamp: TS.into(),
    })
}

#[tokio::test]
async fn embed_is_wrapped_in_embeds_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/webhooks/1/abc")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "embeds": [{
                "title": "💰 Conversion!",
                "color": 65280,
                "fields": [
                    {"name": "Product", "value": "Cama Ortopédica", "inline": true},
                    {"name": "Revenue", "value": "€49.90", "inline": true}
                ],
                "timestamp": TS
            }]
        })))
        .with_status(204)
        .create_async()
        .await;

    let channel = ChannelConfig::embed_webhook(
        "discord",
        Some(&format!("{}/api/webhooks/1/abc", server.url())),
    );
    let outcome = EmbedWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &embed())
        .await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    mock.assert_async().await;
}

#[tokio::test]
async fn embed_rejection_keeps_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(404)
        .with_body(r#"{"message": "Unknown Webhook"}"#)
        .create_async()
        .await;

    let channel = ChannelConfig::embed_webhook("discord", Some(&format!("{}/hook", server.url())));
    let outcome = EmbedWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &embed())
        .await;

    match outcome.failure() {
        Some(FailureReason::RemoteRejected { status, detail }) => {
            assert_eq!(*status, Some(404));
            assert!(detail.as_deref().unwrap().contains("Unknown Webhook"));
        },
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(outcome.to_string(), "failed: remote rejected (HTTP 404)");
}

#[tokio::test]
async fn envelope_is_posted_with_bearer_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/leads")
        .match_header("authorization", "Bearer n8n-key")
        .match_body(Matcher::Json(json!({
            "event": "new_lead",
            "data": {"leadId": "L1", "name": "María G.", "chatId": "C1"},
            "timestamp": TS
        })))
        .with_status(200)
        .create_async()
        .await;

    let channel = ChannelConfig::automation_webhook(
        "automation",
        Some(&format!("{}/webhook/leads", server.url())),
        Some("n8n-key"),
    );
    let outcome = AutomationWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &envelope())
        .await;

    assert!(outcome.is_delivered());
    mock.assert_async().await;
}

#[tokio::test]
async fn envelope_without_key_sends_no_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/leads")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    let channel = ChannelConfig::automation_webhook(
        "automation",
        Some(&format!("{}/webhook/leads", server.url())),
        None,
    );
    let outcome = AutomationWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &envelope())
        .await;

    assert!(outcome.is_delivered());
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_remote_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/webhook/leads")
        .with_status(503)
        .create_async()
        .await;

    let channel = ChannelConfig::automation_webhook(
        "automation",
        Some(&format!("{}/webhook/leads", server.url())),
        None,
    );
    let outcome = AutomationWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &envelope())
        .await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Failed(FailureReason::RemoteRejected {
            status: Some(503),
            detail: None,
        })
    );
}

#[tokio::test]
async fn placeholder_url_is_not_configured_and_silent() {
    let channel = ChannelConfig::embed_webhook("discord", Some("${DISCORD_WEBHOOK_URL}"));
    assert!(!channel.is_enabled());

    let outcome = EmbedWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &embed())
        .await;

    assert_eq!(outcome, DeliveryOutcome::Failed(FailureReason::NotConfigured));
}

#[tokio::test]
async fn payload_for_other_kind_is_refused_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let channel = ChannelConfig::embed_webhook("discord", Some(&server.url()));
    let outcome = EmbedWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &envelope())
        .await;

    assert_eq!(outcome, DeliveryOutcome::Failed(FailureReason::NotConfigured));
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_network_failure() {
    let channel = ChannelConfig::automation_webhook(
        "automation",
        Some("http://127.0.0.1:9/webhook"),
        None,
    );
    let outcome = AutomationWebhookTransport::new(reqwest::Client::new())
        .deliver(&channel, &envelope())
        .await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failed(FailureReason::Network { .. })
    ));
}

#[tokio::test]
async fn integration_ping_posts_test_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/test")
        .match_body(Matcher::Json(json!({
            "type": "test",
            "channel": "whatsapp",
            "source": "leadflow",
            "message": "Integration test ping"
        })))
        .with_status(200)
        .create_async()
        .await;

    let channel = ChannelConfig::automation_webhook(
        "automation",
        Some(&format!("{}/webhook/test", server.url())),
        None,
    );
    AutomationWebhookTransport::new(reqwest::Client::new())
        .ping(&channel, &IntegrationPing::new("whatsapp", "leadflow"))
        .await
        .unwrap();
    mock.assert_async().await;
}
