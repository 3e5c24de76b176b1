//! Prometheus metrics for the relay.
//!
//! Covers the stream connection and the decode -> filter -> dispatch
//! pipeline.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent
//! failure. These panics only occur during static initialization, never at
//! runtime.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Encoder, Gauge,
    TextEncoder,
};

/// Stream connection state (1 = connected, 0 = disconnected).
pub static WS_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "liqrelay_ws_connected",
        "Stream connection state (1=connected)"
    )
    .unwrap()
});

/// Total reconnect attempts scheduled, by trigger.
/// Labels: reason (closed/error/ended)
pub static WS_RECONNECT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "liqrelay_ws_reconnect_total",
        "Total stream reconnect attempts scheduled",
        &["reason"]
    )
    .unwrap()
});

/// Total text frames received from the stream.
pub static FRAMES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "liqrelay_frames_total",
        "Total text frames received from the stream"
    )
    .unwrap()
});

/// Total frames that failed to decode.
pub static DECODE_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "liqrelay_decode_errors_total",
        "Total frames that failed to decode"
    )
    .unwrap()
});

/// Total decoded liquidation events, by filter outcome.
/// Labels: outcome (passed/filtered)
pub static EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "liqrelay_events_total",
        "Total decoded liquidation events by filter outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Total webhook deliveries, by outcome.
/// Labels: outcome (sent/failed)
pub static NOTIFICATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "liqrelay_notifications_total",
        "Total webhook deliveries by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record stream connected.
    pub fn ws_connected() {
        WS_CONNECTED.set(1.0);
    }

    /// Record stream disconnected.
    pub fn ws_disconnected() {
        WS_CONNECTED.set(0.0);
    }

    /// Record a scheduled reconnect attempt.
    pub fn ws_reconnect(reason: &str) {
        WS_RECONNECT_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Record an inbound text frame.
    pub fn frame_received() {
        FRAMES_TOTAL.inc();
    }

    /// Record a frame that failed to decode.
    pub fn decode_error() {
        DECODE_ERRORS_TOTAL.inc();
    }

    /// Record an event that passed the notional filter.
    pub fn event_passed() {
        EVENTS_TOTAL.with_label_values(&["passed"]).inc();
    }

    /// Record an event dropped by the notional filter.
    pub fn event_filtered() {
        EVENTS_TOTAL.with_label_values(&["filtered"]).inc();
    }

    /// Record a successful webhook delivery.
    pub fn notification_sent() {
        NOTIFICATIONS_TOTAL.with_label_values(&["sent"]).inc();
    }

    /// Record a failed webhook delivery.
    pub fn notification_failed() {
        NOTIFICATIONS_TOTAL.with_label_values(&["failed"]).inc();
    }

    /// Render the default registry in Prometheus text exposition format.
    pub fn gather() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buf = Vec::new();
        encoder
            .encode(&families, &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
