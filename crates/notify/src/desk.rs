//! In-memory lead list, daily counters and the operator actions on leads.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    leadflow_telegram::BotApiClient,
    serde::Serialize,
    std::{fmt, sync::Arc},
    tracing::{info, warn},
};

#[cfg(feature = "metrics")]
use leadflow_metrics::{counter, leads as lead_metrics};

use crate::{
    dispatcher::{DispatchReport, Dispatcher},
    error::{Error, Result},
    events::{Conversion, MessageSent, NewLead},
    templates::TemplateCatalog,
};

/// Leads kept by the desk; older ones fall off the end.
pub const MAX_RECENT_LEADS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Converted,
    Lost,
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Lost => "lost",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub chat_id: String,
    pub username: Option<String>,
    /// Note recorded at detection time.
    pub message: String,
    pub product: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: LeadStatus,
    pub source: String,
}

/// What the caller knows about a freshly detected lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeadInput {
    pub name: String,
    pub chat_id: String,
    pub username: Option<String>,
    pub message: String,
    pub product: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeskStats {
    pub leads: u32,
    pub messages: u32,
    pub conversions: u32,
    /// Euros.
    pub revenue: f64,
}

/// Text to send a lead: a catalog template or free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageChoice {
    Template(String),
    Custom(String),
}

#[derive(Debug, Clone)]
pub struct ContactReceipt {
    pub lead_id: String,
    /// Exact text sent to the lead.
    pub text: String,
    pub report: DispatchReport,
}

/// Sends a direct message to a lead's chat.
#[async_trait]
pub trait DirectMessenger: Send + Sync {
    async fn send_direct(&self, chat_id: &str, text: &str) -> leadflow_channels::Result<()>;
}

#[async_trait]
impl DirectMessenger for BotApiClient {
    async fn send_direct(&self, chat_id: &str, text: &str) -> leadflow_channels::Result<()> {
        // Plain text, sent verbatim.
        self.send_message(chat_id, text, None)
            .await
            .map_err(Into::into)
    }
}

/// Single-owner lead state plus the dispatcher that announces changes.
pub struct LeadDesk {
    dispatcher: Arc<Dispatcher>,
    bot: Option<Arc<dyn DirectMessenger>>,
    templates: TemplateCatalog,
    leads: Vec<Lead>,
    stats: DeskStats,
    last_id: i64,
}

impl fmt::Debug for LeadDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadDesk")
            .field("leads", &self.leads.len())
            .field("stats", &self.stats)
            .field("bot", &self.bot.is_some())
            .finish_non_exhaustive()
    }
}

impl LeadDesk {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        bot: Option<Arc<dyn DirectMessenger>>,
        templates: TemplateCatalog,
    ) -> Self {
        Self {
            dispatcher,
            bot,
            templates,
            leads: Vec::with_capacity(MAX_RECENT_LEADS),
            stats: DeskStats::default(),
            last_id: 0,
        }
    }

    /// Recent leads, newest first.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn lead(&self, lead_id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == lead_id)
    }

    #[must_use]
    pub fn stats(&self) -> DeskStats {
        self.stats
    }

    /// Millisecond-timestamp ids, bumped to stay unique within the desk.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        self.last_id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id.to_string()
    }

    fn lead_mut(&mut self, lead_id: &str) -> Result<&mut Lead> {
        self.leads
            .iter_mut()
            .find(|l| l.id == lead_id)
            .ok_or_else(|| Error::UnknownLead {
                lead_id: lead_id.to_owned(),
            })
    }

    /// Record a new lead and announce it.
    pub async fn detect_lead(&mut self, input: NewLeadInput) -> (Lead, DispatchReport) {
        let now = Utc::now();
        let lead = Lead {
            id: self.next_id(now),
            name: input.name,
            chat_id: input.chat_id,
            username: input.username,
            message: input.message,
            product: input.product.filter(|p| !p.trim().is_empty()),
            timestamp: now,
            status: LeadStatus::New,
            source: input.source,
        };

        self.leads.insert(0, lead.clone());
        self.leads.truncate(MAX_RECENT_LEADS);
        self.stats.leads += 1;
        info!(lead_id = %lead.id, name = %lead.name, source = %lead.source, "lead detected");
        #[cfg(feature = "metrics")]
        counter!(lead_metrics::DETECTED_TOTAL).increment(1);

        let event = NewLead::new(&lead.id, &lead.name, &lead.chat_id, &lead.source)
            .with_product(lead.product.as_deref())
            .at(now);
        let report = self.dispatcher.dispatch(&event.into()).await;
        (lead, report)
    }

    /// Message a lead through the bot API, then announce it.
    ///
    /// On any error the lead and counters are left untouched.
    pub async fn contact_lead(&mut self, lead_id: &str, choice: MessageChoice) -> Result<ContactReceipt> {
        let lead = self.lead(lead_id).ok_or_else(|| Error::UnknownLead {
            lead_id: lead_id.to_owned(),
        })?;
        let text = match &choice {
            MessageChoice::Template(template_id) => self
                .templates
                .get(template_id)
                .ok_or_else(|| Error::UnknownTemplate {
                    template_id: template_id.clone(),
                })?
                .render(lead.product.as_deref()),
            MessageChoice::Custom(text) => text.clone(),
        };
        if text.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        let bot = self.bot.as_ref().ok_or(Error::BotNotConfigured)?;

        let chat_id = lead.chat_id.clone();
        if let Err(e) = bot.send_direct(&chat_id, &text).await {
            warn!(lead_id, error = %e, "direct message to lead failed");
            return Err(e.into());
        }

        let lead = self.lead_mut(lead_id)?;
        // Contacting a converted lead again keeps it converted.
        if lead.status != LeadStatus::Converted {
            lead.status = LeadStatus::Contacted;
        }
        let event = MessageSent::new(&lead.id, &lead.name, &lead.chat_id, text.clone())
            .with_product(lead.product.as_deref());
        self.stats.messages += 1;
        info!(lead_id, "lead contacted");
        #[cfg(feature = "metrics")]
        counter!(lead_metrics::CONTACTED_TOTAL).increment(1);

        let report = self.dispatcher.dispatch(&event.into()).await;
        Ok(ContactReceipt {
            lead_id: lead_id.to_owned(),
            text,
            report,
        })
    }

    /// Mark a lead converted and announce the sale.
    ///
    /// The status change stands whatever the notification outcome.
    pub async fn convert_lead(&mut self, lead_id: &str, revenue: f64) -> Result<DispatchReport> {
        if !revenue.is_finite() || revenue < 0.0 {
            return Err(Error::InvalidRevenue { revenue });
        }
        let lead = self.lead_mut(lead_id)?;
        if lead.status == LeadStatus::Converted {
            return Err(Error::AlreadyConverted {
                lead_id: lead_id.to_owned(),
            });
        }
        lead.status = LeadStatus::Converted;
        let event = Conversion::new(&lead.id, &lead.name, &lead.chat_id, revenue)
            .with_product(lead.product.as_deref());

        self.stats.conversions += 1;
        self.stats.revenue += revenue;
        info!(lead_id, revenue, "lead converted");
        #[cfg(feature = "metrics")]
        {
            counter!(lead_metrics::CONVERTED_TOTAL).increment(1);
            counter!(lead_metrics::REVENUE_CENTS_TOTAL).increment((revenue * 100.0).round() as u64);
        }

        Ok(self.dispatcher.dispatch(&event.into()).await)
    }

    /// Mark a lead lost. No notification is sent.
    pub fn mark_lost(&mut self, lead_id: &str) -> Result<()> {
        let lead = self.lead_mut(lead_id)?;
        if lead.status == LeadStatus::Converted {
            return Err(Error::AlreadyConverted {
                lead_id: lead_id.to_owned(),
            });
        }
        lead.status = LeadStatus::Lost;
        info!(lead_id, "lead marked lost");
        Ok(())
    }
}
