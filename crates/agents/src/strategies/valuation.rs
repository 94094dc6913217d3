//! Valuation trader: buys below a private fair value, sells at or above it.
//!
//! # Strategy Logic
//! - **Buy signal**: market price < valuation
//! - **Sell signal**: market price >= valuation
//! - Orders are limits resting at the valuation itself

use serde::{Deserialize, Serialize};
use types::{OrderStyle, Price};

/// Configuration for a valuation-driven trader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Private fair value, drawn once at construction.
    pub valuation: Price,
    /// Magnitude of the target fraction emitted each step.
    pub target: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            valuation: Price::from_units(100),
            target: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValuationStrategy {
    config: ValuationConfig,
}

impl ValuationStrategy {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn valuation(&self) -> Price {
        self.config.valuation
    }

    pub fn signal(&self, market_price: Price) -> f64 {
        if market_price < self.config.valuation {
            self.config.target
        } else {
            -self.config.target
        }
    }

    pub fn order_style(&self) -> OrderStyle {
        OrderStyle::Limit
    }
}
