//! Simulation configuration options.

use agents::PortfolioConfig;
use serde::{Deserialize, Serialize};

/// Largest valuation, in whole currency units, a fundamentalist may draw.
pub const MAX_VALUATION: f64 = 1e9;

/// Longest indicator window a chartist may draw.
pub const MAX_WINDOW: usize = 1_000_000;

/// Largest starting cash balance.
pub const MAX_CASH: f64 = 1e12;

/// Largest starting share count.
pub const MAX_STOCK: i64 = 1_000_000_000_000;

/// Standard deviations above the mean a population's draws must stay under
/// their limit.
const TAIL_SIGMAS: f64 = 10.0;

/// Errors raised when a configuration cannot produce a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("simulation must run for at least one tick")]
    ZeroTicks,
    #[error("{population} population must contain at least one trader")]
    EmptyPopulation { population: &'static str },
    #[error("{population} {parameter} must be finite and non-negative, got {value}")]
    InvalidDistribution {
        population: &'static str,
        parameter: &'static str,
        value: f64,
    },
    #[error("{population} draws can reach {upper}, above the limit of {limit}")]
    DrawOutOfRange {
        population: &'static str,
        upper: f64,
        limit: f64,
    },
    #[error("{parameter} {value} exceeds the limit of {limit}")]
    ExceedsLimit {
        parameter: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("starting cash must be positive, got {0}")]
    NonPositiveCash(f64),
    #[error("starting stock must be non-negative, got {0}")]
    NegativeStock(i64),
    #[error("margin must be positive, got {0}")]
    NonPositiveMargin(f64),
    #[error("target fraction must lie in (0, 1), got {0}")]
    TargetOutOfRange(f64),
}

/// Size of one trader archetype and the Gaussian its private parameter is
/// drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraderPopulation {
    pub count: usize,
    pub mean: f64,
    /// Variance of the draw; the standard deviation is its square root.
    ///
    /// Earlier versions of this model passed the second distribution
    /// parameter straight through as the standard deviation. Configs carried
    /// over from them need the old value squared to reproduce the same
    /// spread.
    pub variance: f64,
}

impl TraderPopulation {
    pub fn new(count: usize, mean: f64, variance: f64) -> Self {
        Self {
            count,
            mean,
            variance,
        }
    }

    /// Rough upper end of the draws: `mean + 10 * sqrt(variance)`.
    pub fn upper_tail(&self) -> f64 {
        self.mean + TAIL_SIGMAS * self.variance.sqrt()
    }

    fn validate(&self, population: &'static str, limit: f64) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptyPopulation { population });
        }
        for (parameter, value) in [("mean", self.mean), ("variance", self.variance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistribution {
                    population,
                    parameter,
                    value,
                });
            }
        }
        let upper = self.upper_tail();
        if upper > limit {
            return Err(ConfigError::DrawOutOfRange {
                population,
                upper,
                limit,
            });
        }
        Ok(())
    }
}

/// Configuration for the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of ticks; every trader acts once per tick.
    pub ticks: u64,

    /// Valuation-driven traders. The mean is also the opening market price.
    pub fundamentalists: TraderPopulation,

    /// Momentum-driven traders; the draw is the indicator window length.
    pub chartists: TraderPopulation,

    /// Starting cash of every trader.
    pub cash: f64,

    /// Starting shares of every trader.
    pub stock: i64,

    /// Margin factor applied when sizing orders.
    pub margin: f64,

    /// Magnitude of the target fraction both strategies emit.
    pub target: f64,

    /// Seed for the parameter draws. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Number of book levels to include in snapshots.
    pub snapshot_depth: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 100,
            fundamentalists: TraderPopulation::new(10, 100.0, 25.0),
            chartists: TraderPopulation::new(10, 10.0, 9.0),
            cash: 10_000.0,
            stock: 100,
            margin: 1.0,
            target: 0.3,
            seed: None,
            snapshot_depth: 10,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter before any trader is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks == 0 {
            return Err(ConfigError::ZeroTicks);
        }
        self.fundamentalists.validate("fundamentalist", MAX_VALUATION)?;
        self.chartists.validate("chartist", MAX_WINDOW as f64)?;
        if !(self.cash.is_finite() && self.cash > 0.0) {
            return Err(ConfigError::NonPositiveCash(self.cash));
        }
        if self.cash > MAX_CASH {
            return Err(ConfigError::ExceedsLimit {
                parameter: "cash",
                value: self.cash,
                limit: MAX_CASH,
            });
        }
        if self.stock < 0 {
            return Err(ConfigError::NegativeStock(self.stock));
        }
        if self.stock > MAX_STOCK {
            return Err(ConfigError::ExceedsLimit {
                parameter: "stock",
                value: self.stock as f64,
                limit: MAX_STOCK as f64,
            });
        }
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return Err(ConfigError::NonPositiveMargin(self.margin));
        }
        if !(self.target > 0.0 && self.target < 1.0) {
            return Err(ConfigError::TargetOutOfRange(self.target));
        }
        Ok(())
    }

    /// Total number of traders across both populations.
    pub fn trader_count(&self) -> usize {
        self.fundamentalists.count + self.chartists.count
    }

    /// Starting balances handed to every trader.
    pub fn portfolio(&self) -> PortfolioConfig {
        PortfolioConfig {
            cash: self.cash,
            stock: self.stock,
            margin: self.margin,
        }
    }

    /// Set the number of ticks.
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Set the valuation-driven population.
    pub fn with_fundamentalists(mut self, population: TraderPopulation) -> Self {
        self.fundamentalists = population;
        self
    }

    /// Set the momentum-driven population.
    pub fn with_chartists(mut self, population: TraderPopulation) -> Self {
        self.chartists = population;
        self
    }

    /// Set the starting cash.
    pub fn with_cash(mut self, cash: f64) -> Self {
        self.cash = cash;
        self
    }

    /// Set the starting stock.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the margin factor.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the target fraction magnitude.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    /// Fix the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the snapshot depth.
    pub fn with_snapshot_depth(mut self, depth: usize) -> Self {
        self.snapshot_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.trader_count(), 20);
        assert_eq!(config.portfolio(), PortfolioConfig::default());
    }

    #[test]
    fn test_builder_setters() {
        let config = SimulationConfig::default()
            .with_ticks(7)
            .with_chartists(TraderPopulation::new(3, 4.0, 1.0))
            .with_seed(42)
            .with_target(0.5);
        assert_eq!(config.ticks, 7);
        assert_eq!(config.chartists.count, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.target, 0.5);
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        let base = SimulationConfig::default();

        assert_eq!(
            base.clone().with_ticks(0).validate(),
            Err(ConfigError::ZeroTicks)
        );
        assert_eq!(
            base.clone()
                .with_fundamentalists(TraderPopulation::new(0, 100.0, 1.0))
                .validate(),
            Err(ConfigError::EmptyPopulation {
                population: "fundamentalist"
            })
        );
        assert!(matches!(
            base.clone()
                .with_chartists(TraderPopulation::new(2, 5.0, f64::NAN))
                .validate(),
            Err(ConfigError::InvalidDistribution {
                parameter: "variance",
                ..
            })
        ));
        assert_eq!(
            base.clone().with_cash(0.0).validate(),
            Err(ConfigError::NonPositiveCash(0.0))
        );
        assert_eq!(
            base.clone().with_margin(-1.0).validate(),
            Err(ConfigError::NonPositiveMargin(-1.0))
        );
        assert_eq!(
            base.with_target(1.0).validate(),
            Err(ConfigError::TargetOutOfRange(1.0))
        );
    }

    #[test]
    fn test_validation_rejects_oversized_valuations() {
        let base = SimulationConfig::default();

        let err = base
            .clone()
            .with_fundamentalists(TraderPopulation::new(1, 1e16, 0.0))
            .validate();
        assert!(matches!(
            err,
            Err(ConfigError::DrawOutOfRange {
                population: "fundamentalist",
                ..
            })
        ));

        // The mean fits but the spread reaches past the limit
        let wide = TraderPopulation::new(1, 1e8, 1e17);
        assert!(wide.upper_tail() > MAX_VALUATION);
        assert!(base.clone().with_fundamentalists(wide).validate().is_err());

        let edge = TraderPopulation::new(1, MAX_VALUATION, 0.0);
        assert_eq!(base.with_fundamentalists(edge).validate(), Ok(()));
    }

    #[test]
    fn test_validation_rejects_oversized_windows() {
        let base = SimulationConfig::default();

        let err = base
            .clone()
            .with_chartists(TraderPopulation::new(1, 1e30, 0.0))
            .validate();
        assert_eq!(
            err,
            Err(ConfigError::DrawOutOfRange {
                population: "chartist",
                upper: 1e30,
                limit: MAX_WINDOW as f64,
            })
        );

        let edge = TraderPopulation::new(1, MAX_WINDOW as f64, 0.0);
        assert_eq!(base.with_chartists(edge).validate(), Ok(()));
    }

    #[test]
    fn test_validation_rejects_oversized_balances() {
        let base = SimulationConfig::default();

        assert!(matches!(
            base.clone().with_cash(1e300).validate(),
            Err(ConfigError::ExceedsLimit {
                parameter: "cash",
                ..
            })
        ));
        assert_eq!(base.clone().with_cash(MAX_CASH).validate(), Ok(()));
        assert!(matches!(
            base.clone().with_stock(MAX_STOCK + 1).validate(),
            Err(ConfigError::ExceedsLimit {
                parameter: "stock",
                ..
            })
        ));
        assert_eq!(base.with_stock(MAX_STOCK).validate(), Ok(()));
    }
}
