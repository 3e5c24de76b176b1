//! Liquidation event types.
//!
//! A `LiquidationEvent` is one forced order decoded from the stream. It is
//! immutable once constructed; the notional is always derived from the
//! price and quantity, never stored or mutated separately.

use crate::decimal::{Notional, Price, Qty};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the liquidated position.
///
/// The exchange reports the direction of the forced *order*: a forced BUY
/// closes a short-squeezed LONG, a forced SELL closes a SHORT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Derive the position side from the order's direction flag.
    pub fn from_order_flag(flag: &str) -> CoreResult<Self> {
        match flag {
            "BUY" => Ok(Side::Long),
            "SELL" => Ok(Side::Short),
            other => Err(CoreError::UnknownSide(other.to_string())),
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Side::Long)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// One decoded liquidation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationEvent {
    /// Instrument identifier (e.g., "BTCUSDT").
    pub symbol: String,
    /// Direction of the liquidated position.
    pub side: Side,
    /// Decimal execution price.
    pub price: Price,
    /// Decimal executed size.
    pub qty: Qty,
    /// Local receipt time. Display only, not authoritative ordering.
    pub observed_at: DateTime<Utc>,
}

impl LiquidationEvent {
    /// Construct an event from decoded fields.
    ///
    /// Price and quantity must be non-negative.
    pub fn new(symbol: String, side: Side, price: Price, qty: Qty) -> CoreResult<Self> {
        if price.is_negative() {
            return Err(CoreError::NegativeValue(format!("price {price}")));
        }
        if qty.is_negative() {
            return Err(CoreError::NegativeValue(format!("qty {qty}")));
        }
        Ok(Self {
            symbol,
            side,
            price,
            qty,
            observed_at: Utc::now(),
        })
    }

    /// USD-equivalent size: price × quantity, recomputed on demand.
    #[inline]
    pub fn notional(&self) -> Notional {
        self.price * self.qty
    }

    /// Base asset portion of the symbol (e.g., "BTC" for "BTCUSDT").
    pub fn base_asset(&self) -> &str {
        self.symbol.strip_suffix("USDT").unwrap_or(&self.symbol)
    }
}
