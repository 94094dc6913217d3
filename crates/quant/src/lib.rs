//! Quantitative analysis crate for the market simulator.
//!
//! This crate provides streaming indicators and statistical utilities used
//! by trader strategies and by the end-of-run summary.
//!
//! # Modules
//!
//! - [`rolling`] - Fixed-capacity rolling window with running sums
//! - [`indicator`] - O(1) rolling indicator (SMA, EMA, variance, momentum)
//! - [`oscillators`] - Streaming RSI and MACD
//! - [`stats`] - Slice statistics and cumulative (Welford) statistics
//!
//! # Example
//!
//! ```
//! use quant::RollingIndicator;
//!
//! let mut momentum = RollingIndicator::new(3);
//! for price in [100.0, 101.0, 103.0, 102.0] {
//!     momentum.push(price);
//! }
//! // 102 minus the evicted 100
//! assert_eq!(momentum.momentum(), Some(2.0));
//! ```
//!
//! # Design Notes
//!
//! - All indicator calculations use `f64`
//! - `Price` values are converted with `to_float` before being pushed

pub mod indicator;
pub mod oscillators;
pub mod rolling;
pub mod stats;

pub use indicator::RollingIndicator;
pub use oscillators::Oscillators;
pub use rolling::RollingWindow;
pub use stats::CumulativeStatistics;
