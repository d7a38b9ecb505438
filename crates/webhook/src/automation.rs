use {
    async_trait::async_trait,
    leadflow_channels::{
        ChannelConfig, ChannelKind, ChannelTransport, DeliveryOutcome, DeliveryPayload, Error,
        Result,
    },
    reqwest::Client,
    serde::Serialize,
    tracing::{debug, info, warn},
};

use crate::post::post_json;

/// Posts [`DeliveryPayload::Envelope`] payloads as-is, with a bearer key when
/// the channel has one.
#[derive(Debug, Clone)]
pub struct AutomationWebhookTransport {
    http: Client,
}

/// Connectivity check body sent by [`AutomationWebhookTransport::ping`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationPing {
    #[serde(rename = "type")]
    pub kind: String,
    pub channel: String,
    pub source: String,
    pub message: String,
}

impl IntegrationPing {
    pub fn new(channel: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind: "test".into(),
            channel: channel.into(),
            source: source.into(),
            message: "Integration test ping".into(),
        }
    }
}

impl AutomationWebhookTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn send(&self, channel: &ChannelConfig, payload: &DeliveryPayload) -> Result<()> {
        let DeliveryPayload::Envelope(envelope) = payload else {
            warn!(
                channel = %channel.name,
                payload = %payload.kind(),
                "payload does not fit an automation webhook"
            );
            return Err(Error::not_configured(&channel.name));
        };
        let enabled = channel.ensure_enabled()?;
        post_json(&self.http, enabled.endpoint, enabled.credential, envelope).await
    }

    /// Post a test ping outside the event flow, to check the workflow is wired.
    pub async fn ping(&self, channel: &ChannelConfig, ping: &IntegrationPing) -> Result<()> {
        if channel.kind != ChannelKind::AutomationWebhook {
            return Err(Error::not_configured(&channel.name));
        }
        let enabled = channel.ensure_enabled()?;
        post_json(&self.http, enabled.endpoint, enabled.credential, ping).await?;
        info!(channel = %channel.name, "integration ping accepted");
        Ok(())
    }
}

#[async_trait]
impl ChannelTransport for AutomationWebhookTransport {
    async fn deliver(&self, channel: &ChannelConfig, payload: &DeliveryPayload) -> DeliveryOutcome {
        let outcome = DeliveryOutcome::from_result(self.send(channel, payload).await);
        match outcome.failure() {
            None => debug!(channel = %channel.name, "envelope delivered"),
            Some(reason) => warn!(channel = %channel.name, %reason, "envelope delivery failed"),
        }
        outcome
    }
}
