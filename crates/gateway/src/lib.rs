//! Always-on utility server used while wiring integrations: identity and
//! liveness probes, a request echo and a mock webhook receiver.

pub mod routes;
pub mod server;
pub mod state;

pub use {
    server::{build_app, start},
    state::UtilsState,
};
