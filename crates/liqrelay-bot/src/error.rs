//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] liqrelay_ws::WsError),

    #[error("Feed error: {0}")]
    Feed(#[from] liqrelay_feed::FeedError),

    #[error("Notification error: {0}")]
    Notify(#[from] liqrelay_notify::NotifyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] liqrelay_telemetry::TelemetryError),

    #[error("Runtime fault: {0}")]
    Runtime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
