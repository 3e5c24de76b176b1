//! Resilient WebSocket client for the forced-order stream.
//!
//! Provides the connection supervisor:
//! - explicit lifecycle state machine (disconnected -> connecting ->
//!   connected -> closing)
//! - automatic reconnection with exponential backoff, bounded by an
//!   attempt cap that is fatal when exhausted
//! - keepalive pings while connected (30s default)
//! - cancellation-aware shutdown
//! - read-only status snapshots for the health endpoint

pub mod error;
pub mod heartbeat;
pub mod status;
pub mod supervisor;

pub use error::{WsError, WsResult};
pub use heartbeat::Keepalive;
pub use status::{ConnectionPhase, StatusHandle, StatusSnapshot};
pub use supervisor::{next_retry, reconnect_delay, ConnectionConfig, ConnectionSupervisor, RetryDecision};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
