use {serde::Serialize, std::fmt};

/// Why a single channel delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// Channel disabled: endpoint or credential missing at startup.
    NotConfigured,
    /// The request never produced a response.
    Network { detail: String },
    /// Non-success status, or a success status with a logical-failure body.
    RemoteRejected {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("not configured"),
            Self::Network { detail } => write!(f, "network failure: {detail}"),
            Self::RemoteRejected {
                status: Some(status),
                ..
            } => write!(f, "remote rejected (HTTP {status})"),
            Self::RemoteRejected { status: None, .. } => f.write_str("remote rejected"),
        }
    }
}

/// Result of one channel's attempt to deliver one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    Failed(FailureReason),
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Delivered => None,
            Self::Failed(reason) => Some(reason),
        }
    }

    /// Map a transport result onto an outcome.
    #[must_use]
    pub fn from_result(result: crate::Result<()>) -> Self {
        match result {
            Ok(()) => Self::Delivered,
            Err(e) => Self::Failed(e.into_reason()),
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(FailureReason::NotConfigured, "not configured")]
    #[case(FailureReason::Network { detail: "timed out".into() }, "network failure: timed out")]
    #[case(
        FailureReason::RemoteRejected { status: None, detail: Some("Bad Request: chat not found".into()) },
        "remote rejected"
    )]
    #[case(
        FailureReason::RemoteRejected { status: Some(401), detail: None },
        "remote rejected (HTTP 401)"
    )]
    fn reason_display(#[case] reason: FailureReason, #[case] expected: &str) {
        assert_eq!(reason.to_string(), expected);
    }

    #[test]
    fn outcome_serializes_with_outcome_tag() {
        let delivered = serde_json::to_value(DeliveryOutcome::Delivered).unwrap();
        assert_eq!(delivered, serde_json::json!({"outcome": "delivered"}));

        let failed =
            serde_json::to_value(DeliveryOutcome::Failed(FailureReason::NotConfigured)).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"outcome": "failed", "reason": "not_configured"})
        );
    }

    #[test]
    fn from_result_maps_errors() {
        assert!(DeliveryOutcome::from_result(Ok(())).is_delivered());
        let failed = DeliveryOutcome::from_result(Err(crate::Error::not_configured("x")));
        assert_eq!(failed.failure(), Some(&FailureReason::NotConfigured));
    }
}
