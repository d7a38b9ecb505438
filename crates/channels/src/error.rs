use std::error::Error as StdError;

use crate::outcome::FailureReason;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed delivery errors shared by every transport.
///
/// These never cross the [`crate::ChannelTransport`] boundary: transports
/// collapse them into a [`FailureReason`] through [`Error::into_reason`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Channel is disabled or was handed a payload it cannot carry.
    #[error("channel not configured: {channel}")]
    NotConfigured { channel: String },

    /// Connection, TLS, timeout or other transport failure.
    #[error("network failure: {context}: {source}")]
    Network {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Remote answered, but with a non-success status or a logical failure.
    #[error("remote rejected{}: {detail}", status_suffix(.status))]
    RemoteRejected { status: Option<u16>, detail: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl Error {
    #[must_use]
    pub fn not_configured(channel: impl std::fmt::Display) -> Self {
        Self::NotConfigured {
            channel: channel.to_string(),
        }
    }

    #[must_use]
    pub fn network(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn rejected(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            detail: detail.into(),
        }
    }

    /// Collapse into the reason reported to dispatch callers.
    #[must_use]
    pub fn into_reason(self) -> FailureReason {
        match self {
            Self::NotConfigured { .. } => FailureReason::NotConfigured,
            Self::Network { context, source } => FailureReason::Network {
                detail: format!("{context}: {source}"),
            },
            Self::RemoteRejected { status, detail } => FailureReason::RemoteRejected {
                status,
                detail: (!detail.is_empty()).then_some(detail),
            },
        }
    }
}
