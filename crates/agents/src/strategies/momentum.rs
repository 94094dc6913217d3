//! Momentum trader: follows the direction of recent price movement.
//!
//! # Strategy Logic
//! - Every observed market price is pushed into a private
//!   [`RollingIndicator`] of the trader's own window length
//! - **Buy signal**: momentum > 0
//! - **Sell signal**: momentum <= 0
//! - Orders are market orders

use quant::RollingIndicator;
use serde::{Deserialize, Serialize};
use types::{OrderStyle, Price};

/// Configuration for a momentum-driven trader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Lookback window. A zero window never sees movement, so it always sells.
    pub window: usize,
    /// Magnitude of the target fraction emitted each step.
    pub target: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window: 5,
            target: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    config: MomentumConfig,
    indicator: RollingIndicator,
}

impl MomentumStrategy {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            indicator: RollingIndicator::new(config.window),
            config,
        }
    }

    pub fn window(&self) -> usize {
        self.indicator.window()
    }

    pub fn indicator(&self) -> &RollingIndicator {
        &self.indicator
    }

    /// Record the price, then read momentum.
    pub fn signal(&mut self, market_price: Price) -> f64 {
        self.indicator.push(market_price.to_float());
        match self.indicator.momentum() {
            Some(m) if m > 0.0 => self.config.target,
            _ => -self.config.target,
        }
    }

    pub fn order_style(&self) -> OrderStyle {
        OrderStyle::Market
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(units: i64) -> Price {
        Price::from_units(units)
    }

    #[test]
    fn test_rising_prices_buy() {
        let mut strategy = MomentumStrategy::new(MomentumConfig {
            window: 3,
            target: 0.3,
        });
        // Single observation has no movement yet
        assert_eq!(strategy.signal(px(100)), -0.3);
        assert_eq!(strategy.signal(px(101)), 0.3);
        assert_eq!(strategy.signal(px(102)), 0.3);
    }

    #[test]
    fn test_falling_prices_sell() {
        let mut strategy = MomentumStrategy::new(MomentumConfig::default());
        for units in [105, 104, 103] {
            assert_eq!(strategy.signal(px(units)), -0.3);
        }
    }

    #[test]
    fn test_flat_prices_sell() {
        let mut strategy = MomentumStrategy::new(MomentumConfig {
            window: 1,
            target: 0.3,
        });
        strategy.signal(px(100));
        assert_eq!(strategy.signal(px(100)), -0.3);
        assert_eq!(strategy.order_style(), OrderStyle::Market);
    }

    #[test]
    fn test_zero_window_always_sells() {
        let mut strategy = MomentumStrategy::new(MomentumConfig {
            window: 0,
            target: 0.3,
        });
        assert_eq!(strategy.window(), 0);
        for units in [100, 120, 140, 90, 200] {
            assert_eq!(strategy.signal(px(units)), -0.3);
        }
    }
}
