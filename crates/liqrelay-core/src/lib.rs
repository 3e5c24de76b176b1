//! Core domain types for the liquidation relay.
//!
//! This crate provides the fundamental types shared by the feed, filter,
//! and notification layers:
//! - `Price`, `Qty`, `Notional`: precision-safe numeric types
//! - `Side`: liquidated position direction
//! - `LiquidationEvent`: one decoded forced-order event

pub mod decimal;
pub mod error;
pub mod event;

pub use decimal::{Notional, Price, Qty};
pub use error::{CoreError, CoreResult};
pub use event::{LiquidationEvent, Side};
