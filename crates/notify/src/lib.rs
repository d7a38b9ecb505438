//! Lead notifications: domain events, per-channel payload formatting, fan-out
//! dispatch and the lead desk that drives them.
//!
//! ```rust,ignore
//! let registry = Arc::new(ChannelRegistry::load(&config));
//! let dispatcher = Dispatcher::standard(registry, build_client(&config.http)?);
//! let report = dispatcher.dispatch(&DomainEvent::NewLead(lead)).await;
//! for failure in report.failures() { /* ... */ }
//! ```

pub mod desk;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod formatter;
pub mod http;
pub mod simulator;
pub mod templates;

pub use {
    desk::{ContactReceipt, DeskStats, DirectMessenger, Lead, LeadDesk, LeadStatus, MessageChoice, NewLeadInput},
    dispatcher::{ChannelOutcome, DispatchReport, Dispatcher},
    error::{Error, Result},
    events::{Conversion, DomainEvent, EventKind, MessageSent, NewLead},
    formatter::format,
    http::build_client,
    simulator::LeadSimulator,
    templates::{MessageTemplate, TemplateCatalog, TemplateCategory, substitute_product},
};
