//! Wire payload shapes, one per channel kind.

use serde::{Deserialize, Serialize};

use crate::config::ChannelKind;

/// Bot API text formatting mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML")]
    Html,
    Markdown,
    MarkdownV2,
}

/// Text message for a bot API chat. The recipient comes from the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    pub text: String,
    pub parse_mode: ParseMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }
}

/// Rich embed posted to a chat webhook inside `{"embeds": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Generic `{event, data, timestamp}` envelope for automation webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    pub data: serde_json::Value,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Channel-specific message body derived from one domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPayload {
    BotMessage(BotMessage),
    Embed(Embed),
    Envelope(Envelope),
}

impl DeliveryPayload {
    /// The channel kind this payload is shaped for.
    #[must_use]
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::BotMessage(_) => ChannelKind::BotApi,
            Self::Embed(_) => ChannelKind::EmbedWebhook,
            Self::Envelope(_) => ChannelKind::AutomationWebhook,
        }
    }
}
