use {
    leadflow_config::LeadflowConfig,
    secrecy::ExposeSecret,
    tracing::{info, warn},
};

use crate::config::{ChannelConfig, ChannelKind};

/// Channel names used by [`ChannelRegistry::load`].
pub const TELEGRAM: &str = "telegram";
pub const DISCORD: &str = "discord";
pub const AUTOMATION: &str = "automation";

/// Ordered, read-only set of configured channels.
///
/// Built once at startup; share it behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: Vec<ChannelConfig>,
}

impl ChannelRegistry {
    /// Build the registry from configuration.
    ///
    /// Never fails: channels with missing or placeholder settings are kept but
    /// disabled.
    pub fn load(config: &LeadflowConfig) -> Self {
        let telegram = &config.telegram;
        let channels = vec![
            ChannelConfig::bot_api(
                TELEGRAM,
                Some(telegram.api_base.as_str()),
                telegram.bot_token.as_ref().map(|t| t.expose_secret().as_str()),
                telegram.chat_id.as_deref(),
            ),
            ChannelConfig::embed_webhook(DISCORD, config.discord.webhook_url.as_deref()),
            ChannelConfig::automation_webhook(
                AUTOMATION,
                config.automation.webhook_url.as_deref(),
                config
                    .automation
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().as_str()),
            ),
        ];

        for channel in &channels {
            match channel.disabled_reason() {
                None => info!(channel = %channel.name, kind = %channel.kind, "channel enabled"),
                Some(reason) => {
                    warn!(channel = %channel.name, kind = %channel.kind, reason, "channel disabled")
                },
            }
        }

        Self { channels }
    }

    /// Build a registry from explicit channels, keeping their order.
    pub fn from_channels(channels: Vec<ChannelConfig>) -> Self {
        Self { channels }
    }

    pub fn get(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter().filter(|c| c.is_enabled())
    }

    pub fn of_kind(&self, kind: ChannelKind) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter().filter(move |c| c.kind == kind)
    }

    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    #[test]
    fn empty_config_disables_everything() {
        let registry = ChannelRegistry::load(&LeadflowConfig::default());
        assert_eq!(registry.names(), vec![TELEGRAM, DISCORD, AUTOMATION]);
        assert_eq!(registry.enabled().count(), 0);
    }

    #[test]
    fn full_config_enables_everything() {
        let mut cfg = LeadflowConfig::default();
        cfg.telegram.bot_token = Some(Secret::new("1:A".into()));
        cfg.telegram.chat_id = Some("555".into());
        cfg.discord.webhook_url = Some("https://discord.example/api/webhooks/1/x".into());
        cfg.automation.webhook_url = Some("https://automation.example/webhook/lead".into());

        let registry = ChannelRegistry::load(&cfg);
        assert_eq!(registry.enabled().count(), 3);
        assert_eq!(registry.get(TELEGRAM).unwrap().kind, ChannelKind::BotApi);
        assert_eq!(
            registry.get(DISCORD).unwrap().kind,
            ChannelKind::EmbedWebhook
        );
        assert_eq!(
            registry.of_kind(ChannelKind::AutomationWebhook).count(),
            1
        );
    }

    #[test]
    fn placeholder_url_disables_only_that_channel() {
        let mut cfg = LeadflowConfig::default();
        cfg.discord.webhook_url = Some("${LEADFLOW_DISCORD_WEBHOOK_URL}".into());
        cfg.automation.webhook_url = Some("https://automation.example/webhook/lead".into());

        let registry = ChannelRegistry::load(&cfg);
        assert!(!registry.get(DISCORD).unwrap().is_enabled());
        assert!(registry.get(AUTOMATION).unwrap().is_enabled());
        assert!(registry.get("missing").is_none());
    }
}
