use {
    async_trait::async_trait,
    leadflow_channels::{
        ChannelConfig, ChannelHealthSnapshot, ChannelKind, ChannelStatus, ChannelTransport,
        DeliveryOutcome, DeliveryPayload,
    },
    reqwest::Client,
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::client::BotApiClient;

/// Delivers [`DeliveryPayload::BotMessage`] payloads to the channel's chat.
#[derive(Debug, Clone)]
pub struct BotApiTransport {
    http: Client,
}

impl BotApiTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    fn client_for(&self, channel: &ChannelConfig) -> leadflow_channels::Result<(BotApiClient, String)> {
        let enabled = channel.ensure_enabled()?;
        let (Some(token), Some(chat_id)) = (enabled.credential, enabled.recipient) else {
            return Err(leadflow_channels::Error::not_configured(&channel.name));
        };
        let client = BotApiClient::new(
            self.http.clone(),
            enabled.endpoint,
            Secret::new(token.to_owned()),
        );
        Ok((client, chat_id.to_owned()))
    }

    async fn send(
        &self,
        channel: &ChannelConfig,
        payload: &DeliveryPayload,
    ) -> leadflow_channels::Result<()> {
        let DeliveryPayload::BotMessage(message) = payload else {
            warn!(
                channel = %channel.name,
                payload = %payload.kind(),
                "payload does not fit a bot API channel"
            );
            return Err(leadflow_channels::Error::not_configured(&channel.name));
        };
        let (client, chat_id) = self.client_for(channel)?;
        client
            .send_message(&chat_id, &message.text, Some(message.parse_mode))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelTransport for BotApiTransport {
    async fn deliver(&self, channel: &ChannelConfig, payload: &DeliveryPayload) -> DeliveryOutcome {
        let outcome = DeliveryOutcome::from_result(self.send(channel, payload).await);
        match outcome.failure() {
            None => debug!(channel = %channel.name, "bot API delivery succeeded"),
            Some(reason) => warn!(channel = %channel.name, %reason, "bot API delivery failed"),
        }
        outcome
    }
}

#[async_trait]
impl ChannelStatus for BotApiTransport {
    async fn probe(&self, channel: &ChannelConfig) -> leadflow_channels::Result<ChannelHealthSnapshot> {
        if channel.kind != ChannelKind::BotApi {
            return Err(leadflow_channels::Error::not_configured(&channel.name));
        }
        let (client, _) = self.client_for(channel)?;
        let snapshot = match client.get_me().await {
            Ok(me) => ChannelHealthSnapshot {
                connected: true,
                channel: channel.name.clone(),
                details: Some(match me.username {
                    Some(username) => format!("@{username}"),
                    None => me.first_name,
                }),
            },
            Err(e) => ChannelHealthSnapshot {
                connected: false,
                channel: channel.name.clone(),
                details: Some(e.to_string()),
            },
        };
        Ok(snapshot)
    }
}
