//! Metric name and label definitions.

/// Per-channel delivery metrics
pub mod delivery {
    /// Delivery attempts, labelled by channel and kind
    pub const ATTEMPTS_TOTAL: &str = "leadflow_delivery_attempts_total";
    /// Successful deliveries
    pub const DELIVERED_TOTAL: &str = "leadflow_delivery_delivered_total";
    /// Failed deliveries, labelled by reason
    pub const FAILED_TOTAL: &str = "leadflow_delivery_failed_total";
    /// Time spent in one transport call, in seconds
    pub const DURATION_SECONDS: &str = "leadflow_delivery_duration_seconds";
}

/// Event dispatch metrics
pub mod dispatch {
    /// Events dispatched, labelled by event
    pub const EVENTS_TOTAL: &str = "leadflow_dispatch_events_total";
    /// Wall time of one fan-out, in seconds
    pub const DURATION_SECONDS: &str = "leadflow_dispatch_duration_seconds";
}

/// Lead desk metrics
pub mod leads {
    /// Leads detected
    pub const DETECTED_TOTAL: &str = "leadflow_leads_detected_total";
    /// Direct messages sent to leads
    pub const CONTACTED_TOTAL: &str = "leadflow_leads_contacted_total";
    /// Leads converted into a sale
    pub const CONVERTED_TOTAL: &str = "leadflow_leads_converted_total";
    /// Revenue from conversions, in euro cents
    pub const REVENUE_CENTS_TOTAL: &str = "leadflow_leads_revenue_cents_total";
}

/// Utility server metrics
pub mod http {
    /// Requests handled, labelled by endpoint
    pub const REQUESTS_TOTAL: &str = "leadflow_http_requests_total";
}

/// Common label keys
pub mod labels {
    pub const CHANNEL: &str = "channel";
    pub const KIND: &str = "kind";
    pub const EVENT: &str = "event";
    pub const REASON: &str = "reason";
    pub const ENDPOINT: &str = "endpoint";
}

/// Histogram buckets
pub mod buckets {
    /// Outbound call durations, 5ms to the 10s default timeout and a bit past
    pub const DELIVERY_DURATION: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0,
    ];
}
