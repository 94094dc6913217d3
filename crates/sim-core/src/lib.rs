//! Sim-core: Market mechanics for the artificial stock market.
//!
//! This crate provides the core market components:
//! - Order book with arena-indexed price levels and price-time priority
//! - Matching engine for limit and all-or-nothing market orders
//! - Market wrapper tracking the running market price
//! - Error handling for market operations

mod error;
mod market;
mod matching;
mod order_book;

pub use error::{Result, SimCoreError};
pub use market::Market;
pub use matching::{DropReason, MatchingEngine, SubmitOutcome};
pub use order_book::{OrderBook, PriceLevel, RestingOrder};
