//! `leadflow notify`: dispatch one hand-built event.

use {
    anyhow::Result,
    clap::{Args, Subcommand},
    leadflow_channels::ChannelRegistry,
    leadflow_config::LeadflowConfig,
    leadflow_notify::{Conversion, Dispatcher, DomainEvent, MessageSent, NewLead, build_client},
    std::sync::Arc,
};

use crate::output::print_report;

/// Who the event is about.
#[derive(Args)]
pub struct LeadArgs {
    #[arg(long)]
    lead_id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    chat_id: String,
    #[arg(long)]
    product: Option<String>,
}

#[derive(Subcommand)]
pub enum NotifyEvent {
    /// A lead was detected.
    NewLead {
        #[command(flatten)]
        lead: LeadArgs,
        /// Where the lead came from (web_visit, cart_abandon, ...).
        #[arg(long, default_value = "web_visit")]
        source: String,
    },
    /// A message was sent to a lead.
    MessageSent {
        #[command(flatten)]
        lead: LeadArgs,
        #[arg(long)]
        message: String,
    },
    /// A lead converted.
    Conversion {
        #[command(flatten)]
        lead: LeadArgs,
        /// Sale amount in euros.
        #[arg(long)]
        revenue: f64,
    },
}

impl NotifyEvent {
    fn into_event(self) -> DomainEvent {
        match self {
            Self::NewLead { lead, source } => NewLead::new(lead.lead_id, lead.name, lead.chat_id, source)
                .with_product(lead.product)
                .into(),
            Self::MessageSent { lead, message } => {
                MessageSent::new(lead.lead_id, lead.name, lead.chat_id, message)
                    .with_product(lead.product)
                    .into()
            },
            Self::Conversion { lead, revenue } => {
                Conversion::new(lead.lead_id, lead.name, lead.chat_id, revenue)
                    .with_product(lead.product)
                    .into()
            },
        }
    }
}

pub async fn handle_notify(config: &LeadflowConfig, event: NotifyEvent) -> Result<()> {
    let registry = Arc::new(ChannelRegistry::load(config));
    let dispatcher = Dispatcher::standard(registry, build_client(&config.http)?);
    let report = dispatcher.dispatch(&event.into_event()).await;
    print_report(&report);
    Ok(())
}
