use async_trait::async_trait;

use crate::{config::ChannelConfig, outcome::DeliveryOutcome, payload::DeliveryPayload};

/// Deliver one payload to one channel.
///
/// Implementations make at most one network call, never retry, and never
/// return an error: every failure is folded into [`DeliveryOutcome::Failed`].
/// A disabled channel must short-circuit to
/// [`crate::FailureReason::NotConfigured`] without any I/O.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn deliver(&self, channel: &ChannelConfig, payload: &DeliveryPayload)
    -> DeliveryOutcome;
}

/// Probe channel health without delivering anything.
#[async_trait]
pub trait ChannelStatus: Send + Sync {
    async fn probe(&self, channel: &ChannelConfig) -> crate::Result<ChannelHealthSnapshot>;
}

/// Channel health snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChannelHealthSnapshot {
    pub connected: bool,
    pub channel: String,
    pub details: Option<String>,
}
