//! Liveness HTTP endpoint for the relay.
//!
//! `GET /` and `GET /health` report process uptime and the current
//! connection phase so an external monitor can detect sustained
//! disconnection without reading logs. `GET /metrics` serves the
//! Prometheus registry. Anything else is 404.

pub mod server;
pub mod state;

pub use server::{create_router, run_server};
pub use state::{HealthSnapshot, HealthState};
