//! Metrics for leadflow.
//!
//! Metric names live in one place ([`delivery`], [`dispatch`], [`leads`],
//! [`http`]) and are recorded through the `metrics` facade. Without an
//! installed recorder every macro is a no-op. With the `prometheus` feature,
//! [`init_metrics`] installs an exporter whose [`MetricsHandle::render`] backs
//! the utility server's `/metrics` route.
//!
//! ```rust,ignore
//! use leadflow_metrics::{counter, delivery, labels};
//!
//! counter!(delivery::ATTEMPTS_TOTAL, labels::CHANNEL => "discord").increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
