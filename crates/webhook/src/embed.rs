use {
    async_trait::async_trait,
    leadflow_channels::{
        ChannelConfig, ChannelTransport, DeliveryOutcome, DeliveryPayload, Embed, Error, Result,
    },
    reqwest::Client,
    serde::Serialize,
    tracing::{debug, warn},
};

use crate::post::post_json;

#[derive(Serialize)]
struct EmbedBody<'a> {
    embeds: [&'a Embed; 1],
}

/// Posts [`DeliveryPayload::Embed`] payloads as `{"embeds": [embed]}`.
#[derive(Debug, Clone)]
pub struct EmbedWebhookTransport {
    http: Client,
}

impl EmbedWebhookTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn send(&self, channel: &ChannelConfig, payload: &DeliveryPayload) -> Result<()> {
        let DeliveryPayload::Embed(embed) = payload else {
            warn!(
                channel = %channel.name,
                payload = %payload.kind(),
                "payload does not fit an embed webhook"
            );
            return Err(Error::not_configured(&channel.name));
        };
        let enabled = channel.ensure_enabled()?;
        post_json(&self.http, enabled.endpoint, None, &EmbedBody { embeds: [embed] }).await
    }
}

#[async_trait]
impl ChannelTransport for EmbedWebhookTransport {
    async fn deliver(&self, channel: &ChannelConfig, payload: &DeliveryPayload) -> DeliveryOutcome {
        let outcome = DeliveryOutcome::from_result(self.send(channel, payload).await);
        match outcome.failure() {
            None => debug!(channel = %channel.name, "embed delivered"),
            Some(reason) => warn!(channel = %channel.name, %reason, "embed delivery failed"),
        }
        outcome
    }
}
