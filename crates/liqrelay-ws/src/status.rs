//! Connection status shared with the health endpoint.
//!
//! The supervisor owns the single mutable status record; everything else
//! reads point-in-time snapshots through `StatusHandle::snapshot`.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Connection lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Closing => write!(f, "closing"),
        }
    }
}

/// Point-in-time view of the connection status.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub phase: ConnectionPhase,
    pub reconnect_attempts: u32,
    /// When the current (or last) connection was established.
    pub connected_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct StatusInner {
    phase: ConnectionPhase,
    reconnect_attempts: u32,
    connected_at: Option<DateTime<Utc>>,
}

/// Cloneable handle to the supervisor-owned connection status.
///
/// Writers are `pub(crate)`: only the supervisor mutates the record.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<RwLock<StatusInner>>,
}

impl StatusHandle {
    /// Create a fresh status record in the disconnected phase.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StatusInner {
                phase: ConnectionPhase::Disconnected,
                reconnect_attempts: 0,
                connected_at: None,
            })),
        }
    }

    /// Read a consistent snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read();
        StatusSnapshot {
            phase: inner.phase,
            reconnect_attempts: inner.reconnect_attempts,
            connected_at: inner.connected_at,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ConnectionPhase {
        self.inner.read().phase
    }

    /// Current consecutive reconnect attempt count.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.read().reconnect_attempts
    }

    pub(crate) fn set_phase(&self, phase: ConnectionPhase) {
        self.inner.write().phase = phase;
    }

    /// Mark the connection established: phase becomes `Connected` and the
    /// attempt counter resets to zero.
    pub(crate) fn mark_connected(&self) {
        let mut inner = self.inner.write();
        inner.phase = ConnectionPhase::Connected;
        inner.reconnect_attempts = 0;
        inner.connected_at = Some(Utc::now());
    }

    pub(crate) fn increment_attempts(&self) -> u32 {
        let mut inner = self.inner.write();
        inner.reconnect_attempts += 1;
        inner.reconnect_attempts
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_disconnected() {
        let status = StatusHandle::new();
        let snap = status.snapshot();
        assert_eq!(snap.phase, ConnectionPhase::Disconnected);
        assert_eq!(snap.reconnect_attempts, 0);
        assert!(snap.connected_at.is_none());
    }

    #[test]
    fn test_mark_connected_resets_attempts() {
        let status = StatusHandle::new();
        status.increment_attempts();
        status.increment_attempts();
        assert_eq!(status.reconnect_attempts(), 2);

        status.mark_connected();
        let snap = status.snapshot();
        assert_eq!(snap.phase, ConnectionPhase::Connected);
        assert_eq!(snap.reconnect_attempts, 0);
        assert!(snap.connected_at.is_some());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let status = StatusHandle::new();
        let before = status.snapshot();
        status.set_phase(ConnectionPhase::Connecting);
        assert_eq!(before.phase, ConnectionPhase::Disconnected);
        assert_eq!(status.phase(), ConnectionPhase::Connecting);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ConnectionPhase::Connected.to_string(), "connected");
        assert_eq!(ConnectionPhase::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionPhase::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionPhase::Closing.to_string(), "closing");
    }
}
