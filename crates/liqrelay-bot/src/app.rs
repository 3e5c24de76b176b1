//! Main application orchestration.
//!
//! Wires the components together:
//! - ConnectionSupervisor feeding raw frames over a channel
//! - decode -> filter -> render -> dispatch pipeline, one frame at a time
//! - health server for external monitors
//! - signal-driven graceful shutdown with a bounded grace period

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use liqrelay_core::Notional;
use liqrelay_feed::{decode, NotionalFilter};
use liqrelay_health::{run_server, HealthState};
use liqrelay_notify::{render, WebhookSink};
use liqrelay_telemetry::Metrics;
use liqrelay_ws::ConnectionSupervisor;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Bounded teardown time after a shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Frame channel capacity between the supervisor and the pipeline.
const FRAME_CHANNEL_CAPACITY: usize = 1000;

/// Why the main loop exited.
enum Exit {
    Signal,
    Supervisor(AppResult<()>),
}

/// Main application.
pub struct Application {
    config: AppConfig,
    filter: NotionalFilter,
    sink: Arc<WebhookSink>,
    health: HealthState,
    shutdown: CancellationToken,
}

impl Application {
    /// Create a new application from validated configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let filter = NotionalFilter::new(Notional::new(config.min_notional));
        let sink = Arc::new(WebhookSink::new(&config.webhook_url)?);

        Ok(Self {
            config,
            filter,
            sink,
            health: HealthState::new(),
            shutdown: CancellationToken::new(),
        })
    }

    /// Token observed by every long-lived task. Exposed so tests can
    /// trigger shutdown without sending process signals.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the application until shutdown or a fatal error.
    pub async fn run(self) -> AppResult<()> {
        info!(
            symbol = %self.config.symbol,
            ws_url = %self.config.ws_url,
            min_notional = %self.filter.min_notional(),
            "Starting relay"
        );

        let (frame_tx, mut frame_rx) = mpsc::channel::<String>(FRAME_CHANNEL_CAPACITY);

        let supervisor = Arc::new(ConnectionSupervisor::new(
            self.config.connection_config(),
            frame_tx,
            self.shutdown.clone(),
        ));
        self.health.set_connection(supervisor.status());

        // Health server runs for the whole process lifetime and drains
        // in-flight responses on shutdown.
        let health_state = self.health.clone();
        let health_port = self.config.http_port;
        let health_shutdown = self.shutdown.clone();
        let health_task = tokio::spawn(async move {
            if let Err(e) = run_server(health_state, health_port, health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        });

        let supervisor_clone = supervisor.clone();
        let mut supervisor_task = tokio::spawn(async move { supervisor_clone.run().await });

        let mut sigterm = signal(SignalKind::terminate())?;

        info!("Entering main event loop");
        let exit = loop {
            tokio::select! {
                Some(frame) = frame_rx.recv() => {
                    self.handle_frame(&frame);
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    break Exit::Signal;
                }

                _ = sigterm.recv() => {
                    info!("SIGTERM received, shutting down");
                    break Exit::Signal;
                }

                result = &mut supervisor_task => {
                    break Exit::Supervisor(match result {
                        Ok(Ok(())) => Ok(()),
                        Ok(Err(e)) => Err(AppError::WebSocket(e)),
                        Err(e) => Err(AppError::Runtime(format!("Supervisor task failed: {e}"))),
                    });
                }
            }
        };

        // Graceful teardown, bounded by the grace period: the supervisor
        // closes the transport and stops its timers, then the health
        // server finishes in-flight responses.
        self.shutdown.cancel();

        let supervisor_still_running = matches!(exit, Exit::Signal);
        let teardown = async {
            if supervisor_still_running {
                let _ = (&mut supervisor_task).await;
            }
            let _ = health_task.await;
        };

        if tokio::time::timeout(SHUTDOWN_GRACE, teardown).await.is_err() {
            warn!(
                grace_secs = SHUTDOWN_GRACE.as_secs(),
                "Shutdown grace period elapsed, forcing exit"
            );
        }

        match exit {
            Exit::Signal => {
                info!("Shutdown complete");
                Ok(())
            }
            Exit::Supervisor(result) => {
                if let Err(ref e) = result {
                    error!(error = %e, "Supervisor terminated");
                }
                result
            }
        }
    }

    /// Process one inbound frame. Per-frame errors are logged and
    /// swallowed; nothing here may tear down the connection.
    fn handle_frame(&self, frame: &str) {
        Metrics::frame_received();

        let event = match decode(frame) {
            Ok(Some(event)) => event,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Discarding undecodable frame");
                Metrics::decode_error();
                return;
            }
        };

        if !self.filter.passes(&event) {
            debug!(
                symbol = %event.symbol,
                notional = %event.notional(),
                "Below notional threshold, skipping"
            );
            Metrics::event_filtered();
            return;
        }
        Metrics::event_passed();

        info!(
            symbol = %event.symbol,
            side = %event.side,
            price = %event.price,
            qty = %event.qty,
            notional = %event.notional(),
            "Liquidation event"
        );

        // Fire-and-forget dispatch: delivery failures are captured here,
        // never propagated back into the frame loop, never retried.
        let payload = render(&event);
        let sink = self.sink.clone();
        let symbol = event.symbol.clone();
        tokio::spawn(async move {
            match sink.deliver(&payload).await {
                Ok(()) => {
                    Metrics::notification_sent();
                    info!(symbol = %symbol, "Liquidation alert sent");
                }
                Err(e) => {
                    Metrics::notification_failed();
                    error!(symbol = %symbol, error = %e, "Webhook delivery failed");
                }
            }
        });
    }
}
