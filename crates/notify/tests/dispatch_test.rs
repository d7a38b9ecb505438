#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Fan-out behaviour, with fake transports and against mock endpoints.

use {
    async_trait::async_trait,
    leadflow_channels::{
        ChannelConfig, ChannelKind, ChannelRegistry, ChannelTransport, DeliveryOutcome,
        DeliveryPayload, FailureReason,
    },
    leadflow_notify::{DomainEvent, Dispatcher, MessageSent, NewLead},
    mockito::Matcher,
    std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
};

struct FakeTransport {
    outcome: DeliveryOutcome,
    delay: Duration,
    calls: AtomicUsize,
    payloads: Mutex<Vec<DeliveryPayload>>,
}

impl FakeTransport {
    fn new(outcome: DeliveryOutcome) -> Arc<Self> {
        Self::slow(outcome, Duration::ZERO)
    }

    fn slow(outcome: DeliveryOutcome, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            delay,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelTransport for FakeTransport {
    async fn deliver(&self, _channel: &ChannelConfig, payload: &DeliveryPayload) -> DeliveryOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

fn scenario_event() -> DomainEvent {
    NewLead::new("1", "María G.", "555", "web_visit")
        .with_product(Some("Collar Premium"))
        .into()
}

fn registry(channels: Vec<ChannelConfig>) -> Arc<ChannelRegistry> {
    Arc::new(ChannelRegistry::from_channels(channels))
}

fn bot(base: &str) -> ChannelConfig {
    ChannelConfig::bot_api("telegram", Some(base), Some("123:ABC"), Some("555"))
}

#[tokio::test]
async fn disabled_channel_is_reported_not_configured_without_a_call() {
    let embed = FakeTransport::new(DeliveryOutcome::Delivered);
    let bot_transport = FakeTransport::new(DeliveryOutcome::Delivered);
    let dispatcher = Dispatcher::new(registry(vec![
        bot("https://api.telegram.org"),
        ChannelConfig::embed_webhook("discord", None),
    ]))
    .with_transport(ChannelKind::BotApi, bot_transport.clone())
    .with_transport(ChannelKind::EmbedWebhook, embed.clone());

    let report = dispatcher.dispatch(&scenario_event()).await;

    assert_eq!(report.len(), 2);
    assert!(report.is_delivered("telegram"));
    assert_eq!(
        report.get("discord"),
        Some(&DeliveryOutcome::Failed(FailureReason::NotConfigured))
    );
    assert_eq!(embed.calls(), 0);
    assert_eq!(bot_transport.calls(), 1);
}

#[tokio::test]
async fn one_failure_does_not_affect_siblings() {
    let failing = FakeTransport::new(DeliveryOutcome::Failed(FailureReason::Network {
        detail: "connection reset".into(),
    }));
    let ok = FakeTransport::slow(DeliveryOutcome::Delivered, Duration::from_millis(20));
    let dispatcher = Dispatcher::new(registry(vec![
        ChannelConfig::embed_webhook("discord", Some("https://chat.example/hook")),
        ChannelConfig::automation_webhook("automation", Some("https://flows.example/hook"), None),
    ]))
    .with_transport(ChannelKind::EmbedWebhook, failing)
    .with_transport(ChannelKind::AutomationWebhook, ok.clone());

    let report = dispatcher.dispatch(&scenario_event()).await;

    assert!(report.is_delivered("automation"));
    assert!(!report.is_delivered("discord"));
    assert_eq!(report.delivered_count(), 1);
    assert!(!report.all_delivered());
    let failures: Vec<_> = report.failures().map(|(name, r)| (name, r.to_string())).collect();
    assert_eq!(failures, vec![("discord", "network failure: connection reset".to_owned())]);
    assert_eq!(ok.calls(), 1);
}

#[tokio::test]
async fn report_keeps_registry_order_and_payload_shapes() {
    let slow_bot = FakeTransport::slow(DeliveryOutcome::Delivered, Duration::from_millis(30));
    let embed = FakeTransport::new(DeliveryOutcome::Delivered);
    let automation = FakeTransport::new(DeliveryOutcome::Delivered);
    let dispatcher = Dispatcher::new(registry(vec![
        bot("https://api.telegram.org"),
        ChannelConfig::embed_webhook("discord", Some("https://chat.example/hook")),
        ChannelConfig::automation_webhook("automation", Some("https://flows.example/hook"), Some("k")),
    ]))
    .with_transport(ChannelKind::BotApi, slow_bot.clone())
    .with_transport(ChannelKind::EmbedWebhook, embed.clone())
    .with_transport(ChannelKind::AutomationWebhook, automation.clone());

    let event: DomainEvent = MessageSent::new("9", "Laura S.", "31", "x".repeat(300)).into();
    let report = dispatcher.dispatch(&event).await;

    let names: Vec<_> = report.iter().map(|o| o.channel.as_str()).collect();
    assert_eq!(names, vec!["telegram", "discord", "automation"]);
    assert!(report.all_delivered());

    assert!(matches!(slow_bot.payloads.lock().unwrap()[0], DeliveryPayload::BotMessage(_)));
    assert!(matches!(embed.payloads.lock().unwrap()[0], DeliveryPayload::Embed(_)));
    let payloads = automation.payloads.lock().unwrap();
    let DeliveryPayload::Envelope(env) = &payloads[0] else {
        panic!("expected envelope");
    };
    assert_eq!(env.event, "message_sent");
    assert!(env.data["message"].as_str().unwrap().chars().count() <= 100);
}

#[tokio::test]
async fn enabled_channel_without_transport_is_not_configured() {
    let dispatcher = Dispatcher::new(registry(vec![ChannelConfig::embed_webhook(
        "discord",
        Some("https://chat.example/hook"),
    )]));
    let report = dispatcher.dispatch(&scenario_event()).await;
    assert_eq!(
        report.get("discord"),
        Some(&DeliveryOutcome::Failed(FailureReason::NotConfigured))
    );
}

#[tokio::test]
async fn empty_registry_yields_empty_report() {
    let dispatcher = Dispatcher::new(registry(Vec::new()));
    let report = dispatcher.dispatch(&scenario_event()).await;
    assert!(report.is_empty());
    assert!(report.all_delivered());
    assert_eq!(report.get("telegram"), None);
}

// ── Scenarios against mock endpoints ────────────────────────────────────────

#[tokio::test]
async fn both_channels_succeed() {
    let mut server = mockito::Server::new_async().await;
    let bot_mock = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .match_body(Matcher::PartialJson(serde_json::json!({"chat_id": "555", "parse_mode": "HTML"})))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{}}"#)
        .create_async()
        .await;
    let hook_mock = server
        .mock("POST", "/hook")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "embeds": [{"color": 0x0088ff, "fields": [
                {"name": "Lead ID", "value": "1", "inline": true},
                {"name": "Chat ID", "value": "555", "inline": true}
            ]}]
        })))
        .with_status(204)
        .create_async()
        .await;

    let dispatcher = Dispatcher::standard(
        registry(vec![
            bot(&server.url()),
            ChannelConfig::embed_webhook("discord", Some(&format!("{}/hook", server.url()))),
        ]),
        reqwest::Client::new(),
    );
    let report = dispatcher.dispatch(&scenario_event()).await;

    assert_eq!(report.get("telegram"), Some(&DeliveryOutcome::Delivered));
    assert_eq!(report.get("discord"), Some(&DeliveryOutcome::Delivered));
    bot_mock.assert_async().await;
    hook_mock.assert_async().await;
}

#[tokio::test]
async fn unset_webhook_reports_not_configured() {
    let mut server = mockito::Server::new_async().await;
    let _bot = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{}}"#)
        .create_async()
        .await;

    let dispatcher = Dispatcher::standard(
        registry(vec![
            bot(&server.url()),
            ChannelConfig::embed_webhook("discord", Some("")),
        ]),
        reqwest::Client::new(),
    );
    let report = dispatcher.dispatch(&scenario_event()).await;

    assert!(report.is_delivered("telegram"));
    let discord = report.get("discord").unwrap();
    assert_eq!(discord.failure().unwrap().to_string(), "not configured");
}

#[tokio::test]
async fn bot_ok_false_is_remote_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _bot = server
        .mock("POST", "/bot123:ABC/sendMessage")
        .with_status(200)
        .with_body(r#"{"ok":false}"#)
        .create_async()
        .await;

    let dispatcher = Dispatcher::standard(registry(vec![bot(&server.url())]), reqwest::Client::new());
    let report = dispatcher.dispatch(&scenario_event()).await;

    let outcome = report.get("telegram").unwrap();
    assert!(!outcome.is_delivered());
    assert_eq!(outcome.failure().unwrap().to_string(), "remote rejected");
}
