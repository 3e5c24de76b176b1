//! Application configuration.
//!
//! Everything is environment-provided. The webhook URL is the one required
//! value; the process refuses to start without it. Parsing goes through a
//! key-lookup closure so tests can supply values without touching the
//! process environment.

use crate::error::{AppError, AppResult};
use liqrelay_feed::filter::DEFAULT_MIN_NOTIONAL;
use liqrelay_ws::ConnectionConfig;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const ENV_WEBHOOK_URL: &str = "LIQRELAY_WEBHOOK_URL";
pub const ENV_HTTP_PORT: &str = "LIQRELAY_HTTP_PORT";
pub const ENV_MIN_NOTIONAL: &str = "LIQRELAY_MIN_NOTIONAL";
pub const ENV_MAX_RECONNECT_ATTEMPTS: &str = "LIQRELAY_MAX_RECONNECT_ATTEMPTS";
pub const ENV_RECONNECT_INITIAL_DELAY_MS: &str = "LIQRELAY_RECONNECT_INITIAL_DELAY_MS";
pub const ENV_SYMBOL: &str = "LIQRELAY_SYMBOL";
pub const ENV_WS_URL: &str = "LIQRELAY_WS_URL";

/// Binance USDⓈ-M futures stream base.
const STREAM_BASE: &str = "wss://fstream.binance.com/ws";

fn default_http_port() -> u16 {
    3000
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_reconnect_initial_delay_ms() -> u64 {
    1000
}

fn default_keepalive_interval_ms() -> u64 {
    30_000
}

fn default_symbol() -> String {
    "asterusdt".to_string()
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Notification endpoint. Required.
    pub webhook_url: String,
    /// Health endpoint listen port.
    pub http_port: u16,
    /// Minimum notional value for forwarding, in USD.
    pub min_notional: Decimal,
    /// Reconnect attempt cap.
    pub max_reconnect_attempts: u32,
    /// Base reconnect delay in milliseconds.
    pub reconnect_initial_delay_ms: u64,
    /// Keepalive probe interval in milliseconds.
    pub keepalive_interval_ms: u64,
    /// Stream symbol (lowercased for the stream name).
    pub symbol: String,
    /// Full stream URL. Derived from the symbol unless overridden.
    pub ws_url: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env(symbol_override: Option<String>) -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), symbol_override)
    }

    /// Parse configuration from a key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        symbol_override: Option<String>,
    ) -> AppResult<Self> {
        let webhook_url = lookup(ENV_WEBHOOK_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("{ENV_WEBHOOK_URL} is required")))?;

        let http_port = parse_or(&lookup, ENV_HTTP_PORT, default_http_port())?;
        let min_notional = parse_or(&lookup, ENV_MIN_NOTIONAL, DEFAULT_MIN_NOTIONAL)?;
        let max_reconnect_attempts = parse_or(
            &lookup,
            ENV_MAX_RECONNECT_ATTEMPTS,
            default_max_reconnect_attempts(),
        )?;
        let reconnect_initial_delay_ms = parse_or(
            &lookup,
            ENV_RECONNECT_INITIAL_DELAY_MS,
            default_reconnect_initial_delay_ms(),
        )?;

        let symbol = symbol_override
            .or_else(|| lookup(ENV_SYMBOL))
            .unwrap_or_else(default_symbol)
            .to_lowercase();

        let ws_url = lookup(ENV_WS_URL)
            .unwrap_or_else(|| format!("{STREAM_BASE}/{symbol}@forceOrder"));

        Ok(Self {
            webhook_url,
            http_port,
            min_notional,
            max_reconnect_attempts,
            reconnect_initial_delay_ms,
            keepalive_interval_ms: default_keepalive_interval_ms(),
            symbol,
            ws_url,
        })
    }

    /// Connection settings for the supervisor.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.ws_url.clone(),
            max_reconnect_attempts: self.max_reconnect_attempts,
            initial_delay_ms: self.reconnect_initial_delay_ms,
            keepalive_interval_ms: self.keepalive_interval_ms,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {key}: {raw}"))),
    }
}
