//! Health state aggregation.
//!
//! Holds the process start time and a read-only handle to the connection
//! status. The handle is installed once the supervisor exists; until then
//! the endpoint reports `not_initialized`.

use chrono::{DateTime, SecondsFormat, Utc};
use liqrelay_ws::{ConnectionPhase, StatusHandle};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// JSON body served by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub uptime_secs: i64,
    pub connection: &'static str,
    pub timestamp: String,
}

/// Shared state behind the health routes.
#[derive(Clone)]
pub struct HealthState {
    started_at: DateTime<Utc>,
    connection: Arc<RwLock<Option<StatusHandle>>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            connection: Arc::new(RwLock::new(None)),
        }
    }

    /// Install the supervisor's status handle.
    pub fn set_connection(&self, status: StatusHandle) {
        *self.connection.write() = Some(status);
    }

    /// Collect a point-in-time health snapshot.
    pub fn collect_snapshot(&self) -> HealthSnapshot {
        let phase = self.connection.read().as_ref().map(|s| s.phase());
        HealthSnapshot {
            status: "ok",
            uptime_secs: (Utc::now() - self.started_at).num_seconds().max(0),
            connection: connection_label(phase),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the connection phase to the wire label. Only a live connection
/// counts as `connected`; transitional phases report `disconnected`.
fn connection_label(phase: Option<ConnectionPhase>) -> &'static str {
    match phase {
        None => "not_initialized",
        Some(ConnectionPhase::Connected) => "connected",
        Some(_) => "disconnected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_label_mapping() {
        assert_eq!(connection_label(None), "not_initialized");
        assert_eq!(
            connection_label(Some(ConnectionPhase::Connected)),
            "connected"
        );
        assert_eq!(
            connection_label(Some(ConnectionPhase::Connecting)),
            "disconnected"
        );
        assert_eq!(
            connection_label(Some(ConnectionPhase::Disconnected)),
            "disconnected"
        );
        assert_eq!(
            connection_label(Some(ConnectionPhase::Closing)),
            "disconnected"
        );
    }

    #[test]
    fn test_snapshot_before_supervisor_exists() {
        let state = HealthState::new();
        let snap = state.collect_snapshot();
        assert_eq!(snap.status, "ok");
        assert_eq!(snap.connection, "not_initialized");
        assert!(snap.uptime_secs >= 0);
    }

    #[test]
    fn test_snapshot_with_status_handle() {
        let state = HealthState::new();
        state.set_connection(StatusHandle::new());
        // fresh handle starts disconnected
        assert_eq!(state.collect_snapshot().connection, "disconnected");
    }
}
