//! Connection supervision for the forced-order stream.
//!
//! Owns the lifecycle of one streaming connection: connect, read frames,
//! detect termination, back off exponentially, reconnect. The retry policy
//! is a pure function of the attempt counter so backoff behavior is
//! testable without a live network.

use crate::error::{WsError, WsResult};
use crate::heartbeat::Keepalive;
use crate::status::{ConnectionPhase, StatusHandle};
use futures_util::{SinkExt, StreamExt};
use liqrelay_telemetry::Metrics;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// WebSocket URL of the forced-order stream.
    pub url: String,
    /// Reconnect attempt cap. Exhausting it is fatal.
    pub max_reconnect_attempts: u32,
    /// Backoff base: delay before attempt k is `initial × 2^k`.
    pub initial_delay_ms: u64,
    /// Keepalive probe interval while connected.
    pub keepalive_interval_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 10,
            initial_delay_ms: 1000,
            keepalive_interval_ms: 30_000,
        }
    }
}

/// Decision taken when the transport drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep this long, then reconnect.
    Retry(Duration),
    /// Attempt cap reached; the supervisor dies.
    GiveUp,
}

/// Backoff delay for the k-th consecutive failed attempt (k starts at 0).
///
/// Strictly `initial × 2^k` with saturating arithmetic; there is no
/// ceiling other than the attempt cap itself.
pub fn reconnect_delay(initial_delay_ms: u64, attempts: u32) -> Duration {
    let factor = 1u64.checked_shl(attempts).unwrap_or(u64::MAX);
    Duration::from_millis(initial_delay_ms.saturating_mul(factor))
}

/// Pure retry policy: (attempt counter, cap, base delay) -> decision.
pub fn next_retry(attempts: u32, max_attempts: u32, initial_delay_ms: u64) -> RetryDecision {
    if attempts >= max_attempts {
        RetryDecision::GiveUp
    } else {
        RetryDecision::Retry(reconnect_delay(initial_delay_ms, attempts))
    }
}

/// Supervisor for one streaming connection.
pub struct ConnectionSupervisor {
    config: ConnectionConfig,
    status: StatusHandle,
    keepalive: Keepalive,
    frame_tx: mpsc::Sender<String>,
    shutdown: CancellationToken,
}

impl ConnectionSupervisor {
    /// Create a new supervisor. Frames received while connected are
    /// forwarded over `frame_tx` in arrival order.
    pub fn new(
        config: ConnectionConfig,
        frame_tx: mpsc::Sender<String>,
        shutdown: CancellationToken,
    ) -> Self {
        let keepalive = Keepalive::new(config.keepalive_interval_ms);
        Self {
            config,
            status: StatusHandle::new(),
            keepalive,
            frame_tx,
            shutdown,
        }
    }

    /// Read-only status handle for the health endpoint.
    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Run the connect/reconnect loop until shutdown or until the attempt
    /// cap is exhausted (fatal).
    pub async fn run(&self) -> WsResult<()> {
        loop {
            if self.shutdown.is_cancelled() {
                self.status.set_phase(ConnectionPhase::Disconnected);
                return Ok(());
            }

            self.status.set_phase(ConnectionPhase::Connecting);

            let reason = match self.try_connect().await {
                Ok(()) => {
                    info!("Stream connection ended");
                    "ended"
                }
                Err(WsError::ConnectionClosed { code, ref reason }) => {
                    warn!(code, %reason, "Stream closed by server");
                    "closed"
                }
                Err(e) => {
                    error!(error = %e, "Stream connection error");
                    "error"
                }
            };

            self.status.set_phase(ConnectionPhase::Disconnected);
            Metrics::ws_disconnected();

            if self.shutdown.is_cancelled() {
                info!("Shutdown requested after disconnect, not reconnecting");
                return Ok(());
            }

            let attempts = self.status.reconnect_attempts();
            match next_retry(
                attempts,
                self.config.max_reconnect_attempts,
                self.config.initial_delay_ms,
            ) {
                RetryDecision::GiveUp => {
                    error!(attempts, "Reconnect attempts exhausted");
                    return Err(WsError::RetriesExhausted { attempts });
                }
                RetryDecision::Retry(delay) => {
                    let attempt = self.status.increment_attempts();
                    Metrics::ws_reconnect(reason);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Reconnecting after backoff"
                    );

                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = self.shutdown.cancelled() => {
                            info!("Shutdown requested during backoff, exiting");
                            self.status.set_phase(ConnectionPhase::Disconnected);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    async fn try_connect(&self) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to forced-order stream");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        self.status.mark_connected();
        Metrics::ws_connected();
        info!("Stream connected");

        self.keepalive.reset();

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("Shutdown signal received in read loop");
                    self.status.set_phase(ConnectionPhase::Closing);
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(error = %e, "Failed to send close frame during shutdown");
                    }
                    self.status.set_phase(ConnectionPhase::Disconnected);
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.keepalive.record_message();
                            self.forward_frame(text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            self.keepalive.record_pong();
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1006, "No close frame".to_string()));
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            return Err(e.into());
                        }
                        None => {
                            warn!("Stream ended without close frame");
                            return Ok(());
                        }
                        _ => {}
                    }
                }

                _ = self.keepalive.wait_for_check() => {
                    if self.keepalive.should_send() {
                        write.send(Message::Ping(Vec::new())).await?;
                        self.keepalive.record_ping();
                        debug!("Sent keepalive ping");
                    }
                }
            }
        }
    }

    /// Hand one frame to the pipeline. Frame handling must never tear down
    /// the connection, so a dropped receiver is only logged.
    async fn forward_frame(&self, text: String) {
        if self.frame_tx.send(text).await.is_err() {
            warn!("Frame receiver dropped");
        }
    }
}
