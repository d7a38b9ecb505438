//! Webhook channels: chat embeds and workflow-automation envelopes.
//!
//! Both are a single JSON `POST`; any 2xx status counts as delivered.

pub mod automation;
pub mod embed;
mod post;

pub use {
    automation::{AutomationWebhookTransport, IntegrationPing},
    embed::EmbedWebhookTransport,
};
