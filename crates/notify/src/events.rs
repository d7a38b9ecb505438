//! Domain events fanned out to the notification channels.

use {
    chrono::{DateTime, Utc},
    serde::Serialize,
    std::fmt,
};

/// A lead was detected (site visit, product view, abandoned cart, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLead {
    pub lead_id: String,
    pub name: String,
    pub chat_id: String,
    pub product: Option<String>,
    pub source: String,
    pub occurred_at: DateTime<Utc>,
}

/// A direct message was sent to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSent {
    pub lead_id: String,
    pub name: String,
    pub chat_id: String,
    pub product: Option<String>,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// A lead turned into a sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub lead_id: String,
    pub name: String,
    pub chat_id: String,
    pub product: Option<String>,
    /// Amount in euros.
    pub revenue: f64,
    pub occurred_at: DateTime<Utc>,
}

impl NewLead {
    pub fn new(
        lead_id: impl Into<String>,
        name: impl Into<String>,
        chat_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            lead_id: lead_id.into(),
            name: name.into(),
            chat_id: chat_id.into(),
            product: None,
            source: source.into(),
            occurred_at: Utc::now(),
        }
    }
}

impl MessageSent {
    pub fn new(
        lead_id: impl Into<String>,
        name: impl Into<String>,
        chat_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            lead_id: lead_id.into(),
            name: name.into(),
            chat_id: chat_id.into(),
            product: None,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

impl Conversion {
    pub fn new(
        lead_id: impl Into<String>,
        name: impl Into<String>,
        chat_id: impl Into<String>,
        revenue: f64,
    ) -> Self {
        Self {
            lead_id: lead_id.into(),
            name: name.into(),
            chat_id: chat_id.into(),
            product: None,
            revenue,
            occurred_at: Utc::now(),
        }
    }
}

macro_rules! event_builders {
    ($($ty:ty),+) => {$(
        impl $ty {
            /// Attach a product label; blank labels are ignored.
            #[must_use]
            pub fn with_product(mut self, product: Option<impl Into<String>>) -> Self {
                self.product = product.map(Into::into).filter(|p: &String| !p.trim().is_empty());
                self
            }

            /// Pin the event time, for replays and deterministic tests.
            #[must_use]
            pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
                self.occurred_at = occurred_at;
                self
            }
        }
    )+};
}

event_builders!(NewLead, MessageSent, Conversion);

/// Event discriminant, also the automation envelope's `event` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewLead,
    MessageSent,
    Conversion,
}

impl EventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewLead => "new_lead",
            Self::MessageSent => "message_sent",
            Self::Conversion => "conversion",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of events the dispatcher knows how to format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    NewLead(NewLead),
    MessageSent(MessageSent),
    Conversion(Conversion),
}

impl DomainEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewLead(_) => EventKind::NewLead,
            Self::MessageSent(_) => EventKind::MessageSent,
            Self::Conversion(_) => EventKind::Conversion,
        }
    }

    #[must_use]
    pub fn lead_id(&self) -> &str {
        match self {
            Self::NewLead(e) => &e.lead_id,
            Self::MessageSent(e) => &e.lead_id,
            Self::Conversion(e) => &e.lead_id,
        }
    }

    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::NewLead(e) => e.occurred_at,
            Self::MessageSent(e) => e.occurred_at,
            Self::Conversion(e) => e.occurred_at,
        }
    }
}

impl From<NewLead> for DomainEvent {
    fn from(event: NewLead) -> Self {
        Self::NewLead(event)
    }
}

impl From<MessageSent> for DomainEvent {
    fn from(event: MessageSent) -> Self {
        Self::MessageSent(event)
    }
}

impl From<Conversion> for DomainEvent {
    fn from(event: Conversion) -> Self {
        Self::Conversion(event)
    }
}
