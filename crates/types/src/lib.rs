//! Core types for the artificial stock market simulation.
//!
//! This crate provides the shared data types used across the workspace:
//! trader identifiers, fixed-point prices, orders, match events and
//! read-only book views.

pub mod book;
pub mod ids;
pub mod money;
pub mod order;
pub mod trade;

pub use book::{BookLevel, BookSnapshot};
pub use ids::{PRICE_SCALE, Tick, TraderId};
pub use money::{Price, Quantity};
pub use order::{BookSide, Order, OrderError, OrderKind, OrderStyle};
pub use trade::Match;
