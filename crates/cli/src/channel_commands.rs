//! `leadflow channels`: list, probe and ping the configured channels.

use {
    anyhow::{Result, bail},
    clap::Subcommand,
    leadflow_channels::{ChannelKind, ChannelRegistry, ChannelStatus, registry::AUTOMATION},
    leadflow_config::LeadflowConfig,
    leadflow_notify::build_client,
    leadflow_telegram::{BotApiTransport, bot_link},
    leadflow_webhook::{AutomationWebhookTransport, IntegrationPing},
};

use crate::output::redact_url;

#[derive(Subcommand)]
pub enum ChannelAction {
    /// Show every channel and whether it is enabled.
    List,
    /// Check bot API credentials with `getMe`.
    Probe,
    /// Post a test ping to the automation webhook.
    Ping {
        /// Value of the ping's `channel` field.
        #[arg(long, default_value = "telegram")]
        channel: String,
    },
}

pub async fn handle_channels(config: &LeadflowConfig, action: ChannelAction) -> Result<()> {
    let registry = ChannelRegistry::load(config);
    match action {
        ChannelAction::List => {
            list(config, &registry);
            Ok(())
        },
        ChannelAction::Probe => probe(config, &registry).await,
        ChannelAction::Ping { channel } => ping(config, &registry, channel).await,
    }
}

fn list(config: &LeadflowConfig, registry: &ChannelRegistry) {
    for channel in registry.iter() {
        let state = match channel.disabled_reason() {
            None => "enabled".to_owned(),
            Some(reason) => format!("disabled ({reason})"),
        };
        let target = match (channel.kind, channel.endpoint.as_deref()) {
            (ChannelKind::BotApi, _) => channel
                .recipient
                .as_deref()
                .map(|chat| format!("chat {chat}"))
                .unwrap_or_default(),
            (_, Some(endpoint)) => redact_url(endpoint),
            (_, None) => String::new(),
        };
        println!("{:<12} {:<19} {:<40} {target}", channel.name, channel.kind.as_str(), state);
    }
    if let Some(link) = config
        .telegram
        .bot_username
        .as_deref()
        .and_then(bot_link)
    {
        println!("bot: {link}");
    }
}

async fn probe(config: &LeadflowConfig, registry: &ChannelRegistry) -> Result<()> {
    let transport = BotApiTransport::new(build_client(&config.http)?);
    let mut probed = 0;
    for channel in registry.of_kind(ChannelKind::BotApi) {
        probed += 1;
        match transport.probe(channel).await {
            Ok(snapshot) if snapshot.connected => println!(
                "{:<12} connected {}",
                snapshot.channel,
                snapshot.details.unwrap_or_default()
            ),
            Ok(snapshot) => println!(
                "{:<12} unreachable: {}",
                snapshot.channel,
                snapshot.details.unwrap_or_default()
            ),
            Err(e) => println!("{:<12} {e}", channel.name),
        }
    }
    if probed == 0 {
        println!("no bot API channels registered");
    }
    Ok(())
}

async fn ping(config: &LeadflowConfig, registry: &ChannelRegistry, channel: String) -> Result<()> {
    let Some(target) = registry.get(AUTOMATION) else {
        bail!("no automation channel registered");
    };
    let transport = AutomationWebhookTransport::new(build_client(&config.http)?);
    transport
        .ping(target, &IntegrationPing::new(channel, "leadflow"))
        .await?;
    println!("automation webhook accepted the ping");
    Ok(())
}
