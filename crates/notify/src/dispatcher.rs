//! Fan one event out to every registered channel.

use {
    futures::future::join_all,
    leadflow_channels::{
        ChannelConfig, ChannelKind, ChannelRegistry, ChannelTransport, DeliveryOutcome,
        FailureReason,
    },
    leadflow_telegram::BotApiTransport,
    leadflow_webhook::{AutomationWebhookTransport, EmbedWebhookTransport},
    std::{collections::HashMap, sync::Arc, time::Instant},
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use leadflow_metrics::{counter, delivery, dispatch as dispatch_metrics, histogram, labels};

use crate::{
    events::{DomainEvent, EventKind},
    formatter::format,
};

/// Outcome of one channel within a [`DispatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel: String,
    pub kind: ChannelKind,
    pub outcome: DeliveryOutcome,
}

/// Per-channel outcomes of one dispatch, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    event: EventKind,
    outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    #[must_use]
    pub fn event(&self) -> EventKind {
        self.event
    }

    #[must_use]
    pub fn get(&self, channel: &str) -> Option<&DeliveryOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.channel == channel)
            .map(|o| &o.outcome)
    }

    #[must_use]
    pub fn is_delivered(&self, channel: &str) -> bool {
        self.get(channel).is_some_and(DeliveryOutcome::is_delivered)
    }

    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_delivered())
            .count()
    }

    /// Failed channels with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.outcome.failure().map(|r| (o.channel.as_str(), r)))
    }

    /// `true` when every registered channel delivered. Vacuously true for an
    /// empty registry.
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.outcomes.iter().all(|o| o.outcome.is_delivered())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelOutcome> {
        self.outcomes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl<'a> IntoIterator for &'a DispatchReport {
    type IntoIter = std::slice::Iter<'a, ChannelOutcome>;
    type Item = &'a ChannelOutcome;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Formats and delivers events through one transport per channel kind.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ChannelRegistry>,
    transports: HashMap<ChannelKind, Arc<dyn ChannelTransport>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("channels", &self.registry.names())
            .field("transports", &self.transports.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher without transports; add them with [`Self::with_transport`].
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self {
            registry,
            transports: HashMap::new(),
        }
    }

    /// Dispatcher wired with the HTTP transports for every channel kind.
    pub fn standard(registry: Arc<ChannelRegistry>, http: reqwest::Client) -> Self {
        Self::new(registry)
            .with_transport(
                ChannelKind::BotApi,
                Arc::new(BotApiTransport::new(http.clone())),
            )
            .with_transport(
                ChannelKind::EmbedWebhook,
                Arc::new(EmbedWebhookTransport::new(http.clone())),
            )
            .with_transport(
                ChannelKind::AutomationWebhook,
                Arc::new(AutomationWebhookTransport::new(http)),
            )
    }

    #[must_use]
    pub fn with_transport(mut self, kind: ChannelKind, transport: Arc<dyn ChannelTransport>) -> Self {
        self.transports.insert(kind, transport);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Deliver `event` to every registered channel concurrently.
    ///
    /// Every channel gets exactly one outcome; no failure cancels a sibling
    /// delivery and nothing is retried.
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchReport {
        let kind = event.kind();
        let started = Instant::now();

        let deliveries = self.registry.iter().map(|channel| async move {
            ChannelOutcome {
                channel: channel.name.clone(),
                kind: channel.kind,
                outcome: self.deliver_one(channel, event).await,
            }
        });
        let outcomes = join_all(deliveries).await;

        let report = DispatchReport {
            event: kind,
            outcomes,
        };
        info!(
            event = %kind,
            lead_id = event.lead_id(),
            delivered = report.delivered_count(),
            channels = report.len(),
            "event dispatched"
        );

        #[cfg(feature = "metrics")]
        {
            counter!(dispatch_metrics::EVENTS_TOTAL, labels::EVENT => kind.as_str()).increment(1);
            histogram!(dispatch_metrics::DURATION_SECONDS, labels::EVENT => kind.as_str())
                .record(started.elapsed().as_secs_f64());
        }
        #[cfg(not(feature = "metrics"))]
        debug!(event = %kind, elapsed_ms = started.elapsed().as_millis() as u64, "fan-out finished");

        report
    }

    async fn deliver_one(&self, channel: &ChannelConfig, event: &DomainEvent) -> DeliveryOutcome {
        if !channel.is_enabled() {
            debug!(
                channel = %channel.name,
                reason = channel.disabled_reason().unwrap_or_default(),
                "channel disabled, skipping delivery"
            );
            return DeliveryOutcome::Failed(FailureReason::NotConfigured);
        }
        let Some(transport) = self.transports.get(&channel.kind) else {
            warn!(channel = %channel.name, kind = %channel.kind, "no transport for channel kind");
            return DeliveryOutcome::Failed(FailureReason::NotConfigured);
        };

        let payload = format(event, channel.kind);
        let started = Instant::now();
        let outcome = transport.deliver(channel, &payload).await;
        let elapsed = started.elapsed();

        match outcome.failure() {
            None => debug!(channel = %channel.name, event = %event.kind(), ?elapsed, "delivered"),
            Some(reason) => warn!(channel = %channel.name, event = %event.kind(), %reason, "delivery failed"),
        }
        #[cfg(feature = "metrics")]
        record_delivery(channel, &outcome, elapsed.as_secs_f64());

        outcome
    }
}

#[cfg(feature = "metrics")]
fn record_delivery(channel: &ChannelConfig, outcome: &DeliveryOutcome, seconds: f64) {
    let name = channel.name.clone();
    counter!(delivery::ATTEMPTS_TOTAL, labels::CHANNEL => name.clone(), labels::KIND => channel.kind.as_str())
        .increment(1);
    histogram!(delivery::DURATION_SECONDS, labels::CHANNEL => name.clone()).record(seconds);
    match outcome {
        DeliveryOutcome::Delivered => {
            counter!(delivery::DELIVERED_TOTAL, labels::CHANNEL => name).increment(1);
        },
        DeliveryOutcome::Failed(reason) => {
            let reason = match reason {
                FailureReason::NotConfigured => "not_configured",
                FailureReason::Network { .. } => "network",
                FailureReason::RemoteRejected { .. } => "remote_rejected",
            };
            counter!(delivery::FAILED_TOTAL, labels::CHANNEL => name, labels::REASON => reason)
                .increment(1);
        },
    }
}
