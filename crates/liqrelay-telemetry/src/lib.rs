//! Structured logging and Prometheus metrics for the relay.
//!
//! - structured JSON logging with tracing (pretty output in development)
//! - counters and gauges for the stream connection and the
//!   decode -> filter -> dispatch pipeline

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
