//! Minimum-notional event filter.
//!
//! Noise reduction, not correctness: small liquidations are dropped before
//! formatting so the webhook is not spammed. The threshold is one
//! adjustable value, supplied by configuration.

use liqrelay_core::{LiquidationEvent, Notional};
use rust_decimal::Decimal;

/// Default minimum notional in USD.
pub const DEFAULT_MIN_NOTIONAL: Decimal = Decimal::ONE_THOUSAND;

/// Pass/fail filter on event notional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotionalFilter {
    min_notional: Notional,
}

impl NotionalFilter {
    pub fn new(min_notional: Notional) -> Self {
        Self { min_notional }
    }

    /// The configured threshold.
    pub fn min_notional(&self) -> Notional {
        self.min_notional
    }

    /// Pure pass/fail: events with notional strictly below the threshold
    /// are dropped.
    pub fn passes(&self, event: &LiquidationEvent) -> bool {
        event.notional() >= self.min_notional
    }
}

impl Default for NotionalFilter {
    fn default() -> Self {
        Self::new(Notional::new(DEFAULT_MIN_NOTIONAL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liqrelay_core::{Price, Qty, Side};
    use rust_decimal_macros::dec;

    fn event(price: Decimal, qty: Decimal) -> LiquidationEvent {
        LiquidationEvent::new(
            "BTCUSDT".to_string(),
            Side::Long,
            Price::new(price),
            Qty::new(qty),
        )
        .unwrap()
    }

    #[test]
    fn test_below_threshold_dropped() {
        let filter = NotionalFilter::default();
        // 3000 * 0.1 = 300 < 1000
        assert!(!filter.passes(&event(dec!(3000.00), dec!(0.1))));
    }

    #[test]
    fn test_at_threshold_passes() {
        let filter = NotionalFilter::default();
        // 50000 * 0.02 = 1000, >= is a pass
        assert!(filter.passes(&event(dec!(50000.00), dec!(0.02))));
    }

    #[test]
    fn test_above_threshold_passes() {
        let filter = NotionalFilter::default();
        assert!(filter.passes(&event(dec!(50000), dec!(1))));
    }

    #[test]
    fn test_custom_threshold() {
        let filter = NotionalFilter::new(Notional::new(dec!(250)));
        assert!(filter.passes(&event(dec!(3000.00), dec!(0.1))));
        assert!(!filter.passes(&event(dec!(100), dec!(1))));
    }
}
