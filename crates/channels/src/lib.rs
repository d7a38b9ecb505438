//! Delivery channel model.
//!
//! A channel is one external delivery endpoint (bot API chat, embed webhook,
//! automation webhook) with its own URL, credential and enabled flag. This
//! crate holds the immutable channel configuration, the registry built from
//! [`leadflow_config::LeadflowConfig`], the wire payload shapes, the
//! per-channel delivery outcome, and the [`ChannelTransport`] trait each
//! transport crate implements.

pub mod config;
pub mod error;
pub mod outcome;
pub mod payload;
pub mod registry;
pub mod transport;

pub use {
    config::{ChannelConfig, ChannelKind, EnabledChannel},
    error::{Error, Result},
    outcome::{DeliveryOutcome, FailureReason},
    payload::{BotMessage, DeliveryPayload, Embed, EmbedField, Envelope, ParseMode},
    registry::ChannelRegistry,
    transport::{ChannelHealthSnapshot, ChannelStatus, ChannelTransport},
};
