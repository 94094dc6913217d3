//! Simulation crate: the tick clock of the artificial market.
//!
//! A [`Simulation`] owns one [`sim_core::Market`] and a fixed roster of
//! [`agents::Trader`]s built from a [`SimulationConfig`]:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Simulation.step()            │
//! │                                         │
//! │  for each trader, in creation order:    │
//! │    1. Read market price                 │
//! │    2. trader.decide() (signal + sizing) │
//! │    3. market.submit()                   │
//! │    4. Apply matches to portfolios       │
//! │    5. Record market price               │
//! │                                         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use simulation::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default().with_ticks(5).with_seed(1);
//! let mut sim = Simulation::new(config).unwrap();
//! let report = sim.run();
//!
//! assert_eq!(report.prices.len(), 5 * 20);
//! assert_eq!(report.pnl.len(), 20);
//! ```

pub mod config;
mod error;
mod report;
mod runner;

pub use config::{ConfigError, SimulationConfig, TraderPopulation};
pub use error::{Result, SimulationError};
pub use report::{PriceSummary, SimulationReport, TraderPnl};
pub use runner::{RunState, Simulation, SimulationStats};
