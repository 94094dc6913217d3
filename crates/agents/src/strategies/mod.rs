//! Trading strategy implementations.
//!
//! Each strategy turns the current market price into a signed target
//! fraction of the portfolio. Dispatch is by [`Strategy`] variant.
//!
//! # Available Strategies
//! - [`ValuationStrategy`] - Limit orders around a private fair value
//! - [`MomentumStrategy`] - Market orders following rolling momentum

mod momentum;
mod valuation;

pub use momentum::{MomentumConfig, MomentumStrategy};
pub use valuation::{ValuationConfig, ValuationStrategy};

use types::{OrderStyle, Price};

/// The two trader archetypes.
#[derive(Debug, Clone)]
pub enum Strategy {
    Valuation(ValuationStrategy),
    Momentum(MomentumStrategy),
}

impl Strategy {
    /// Target fraction for this step. Never zero.
    pub fn signal(&mut self, market_price: Price) -> f64 {
        match self {
            Strategy::Valuation(s) => s.signal(market_price),
            Strategy::Momentum(s) => s.signal(market_price),
        }
    }

    pub fn order_style(&self) -> OrderStyle {
        match self {
            Strategy::Valuation(s) => s.order_style(),
            Strategy::Momentum(s) => s.order_style(),
        }
    }

    /// Price attached to limit orders.
    pub fn limit_price(&self) -> Option<Price> {
        match self {
            Strategy::Valuation(s) => Some(s.valuation()),
            Strategy::Momentum(_) => None,
        }
    }

    /// Prefix used for trader identifiers of this archetype.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Strategy::Valuation(_) => "fundamentalist",
            Strategy::Momentum(_) => "chartist",
        }
    }
}
