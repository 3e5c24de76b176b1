//! Frame decoding for the forced-order stream.
//!
//! A liquidation frame wraps the forced order in an `o` object:
//!
//! ```json
//! {"e":"forceOrder","E":1568014460893,
//!  "o":{"s":"BTCUSDT","S":"SELL","o":"LIMIT","q":"0.014","p":"9910", ...}}
//! ```
//!
//! Frames without an `o` object are not liquidation events and are
//! silently ignorable; frames that fail to parse are decode errors the
//! caller logs and discards.

use crate::error::{FeedError, FeedResult};
use liqrelay_core::{LiquidationEvent, Price, Qty, Side};
use serde::Deserialize;
use tracing::debug;

/// Raw inbound frame. Only the order sub-record is of interest.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    o: Option<RawForceOrder>,
}

/// Forced-order sub-record. Price and quantity arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct RawForceOrder {
    #[serde(rename = "s")]
    symbol: String,
    /// Direction flag of the forced order ("BUY"/"SELL").
    #[serde(rename = "S")]
    side: String,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    qty: String,
}

/// Decode one text frame.
///
/// Returns `Ok(None)` for well-formed frames that are not liquidation
/// events, `Ok(Some(event))` for a decoded liquidation, and `Err` for
/// malformed frames (bad JSON, unknown side, unparseable decimals).
pub fn decode(text: &str) -> FeedResult<Option<LiquidationEvent>> {
    let frame: RawFrame = serde_json::from_str(text)?;

    let order = match frame.o {
        Some(order) => order,
        None => {
            debug!("Frame without order sub-record, ignoring");
            return Ok(None);
        }
    };

    let side = Side::from_order_flag(&order.side)?;
    let price: Price = order
        .price
        .parse()
        .map_err(|_| FeedError::ParseError(format!("Invalid price: {}", order.price)))?;
    let qty: Qty = order
        .qty
        .parse()
        .map_err(|_| FeedError::ParseError(format!("Invalid quantity: {}", order.qty)))?;

    let event = LiquidationEvent::new(order.symbol, side, price, qty)?;

    debug!(
        symbol = %event.symbol,
        side = %event.side,
        price = %event.price,
        qty = %event.qty,
        notional = %event.notional(),
        "Decoded liquidation event"
    );

    Ok(Some(event))
}
