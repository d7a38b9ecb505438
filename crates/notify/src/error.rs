#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("message is empty")]
    EmptyMessage,

    #[error("unknown lead: {lead_id}")]
    UnknownLead { lead_id: String },

    #[error("unknown template: {template_id}")]
    UnknownTemplate { template_id: String },

    #[error("lead {lead_id} is already converted")]
    AlreadyConverted { lead_id: String },

    #[error("invalid revenue: {revenue}")]
    InvalidRevenue { revenue: f64 },

    #[error("bot API is not configured")]
    BotNotConfigured,

    #[error("direct message failed: {0}")]
    Delivery(#[from] leadflow_channels::Error),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
