//! Agents crate: traders for the artificial stock market.
//!
//! This crate provides:
//! - [`PositionPnl`] - weighted-average position and P&L accounting
//! - [`Portfolio`] - sizing, reservation-based risk checks, fill bookkeeping
//! - [`Strategy`] - the valuation and momentum archetypes
//! - [`Trader`] - a strategy bound to a portfolio and an identifier
//!
//! # Architecture
//! Each step a trader observes the market price, its strategy emits a target
//! fraction, and its portfolio turns that into a sized, reserved order. The
//! simulation submits the order and routes resulting matches back through
//! [`Trader::apply_match`].
//!
//! # Example
//! ```
//! use agents::{PortfolioConfig, Strategy, Trader, ValuationConfig, ValuationStrategy};
//! use types::{Price, TraderId};
//!
//! let mut trader = Trader::new(
//!     TraderId::from("fundamentalist_1"),
//!     Strategy::Valuation(ValuationStrategy::new(ValuationConfig::default())),
//!     PortfolioConfig::default(),
//! );
//! let order = trader.decide(Price::from_units(90)).unwrap();
//! assert!(order.signed_quantity > 0);
//! ```

mod error;
pub mod pnl;
pub mod portfolio;
pub mod strategies;
mod trader;

pub use error::{Result, RiskViolation, TraderError};
pub use pnl::{PositionPnl, Transition};
pub use portfolio::{MAX_ORDER_SIZE, Portfolio, PortfolioConfig};
pub use strategies::{
    MomentumConfig, MomentumStrategy, Strategy, ValuationConfig, ValuationStrategy,
};
pub use trader::Trader;
