//! Simulation runner: the deterministic tick clock.
//!
//! Every tick walks the traders in creation order (fundamentalists first,
//! then chartists). Each trader step:
//!
//! 1. Reads the current market price, which already reflects fills from
//!    earlier steps of the same tick
//! 2. Asks the trader for an order (signal, sizing, risk check)
//! 3. Submits the order synchronously to the market
//! 4. Books every match on the portfolio it belongs to
//! 5. Appends the resulting market price to the history
//!
//! Nothing runs concurrently, so a fixed seed reproduces the same price
//! history and P&L table.

use std::collections::HashMap;

use agents::{
    MomentumConfig, MomentumStrategy, Strategy, Trader, TraderError, ValuationConfig,
    ValuationStrategy,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use sim_core::Market;
use tracing::{debug, info, warn};
use types::{BookSnapshot, Price, Tick, TraderId};

use crate::config::{MAX_VALUATION, MAX_WINDOW, SimulationConfig, TraderPopulation};
use crate::error::{Result, SimulationError};
use crate::report::{PriceSummary, SimulationReport, TraderPnl};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Traders are built but no tick has run.
    Uninitialized,
    /// `tick` is the next tick to run.
    Running { tick: Tick },
    Completed,
}

/// Counters accumulated over the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks fully processed.
    pub ticks: Tick,

    /// Orders that reached the market.
    pub orders_submitted: u64,

    /// Decisions suppressed by the portfolio's risk checks.
    pub risk_rejections: u64,

    /// Orders rejected as malformed, by the trader or by the book.
    pub invalid_orders: u64,

    /// Market orders dropped for lack of opposite depth.
    pub dropped_market_orders: u64,

    /// Match events, counting both sides of every execution.
    pub matches: u64,

    /// Submissions that left a remainder resting on the book.
    pub resting_submissions: u64,
}

/// The main simulation runner.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    market: Market,
    traders: Vec<Trader>,
    /// Trader id to position in `traders`.
    index: HashMap<TraderId, usize>,
    prices: Vec<Price>,
    state: RunState,
    stats: SimulationStats,
}

impl Simulation {
    /// Validate the configuration, draw every trader's private parameter
    /// and open the market at the fundamentalists' mean valuation.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let traders = build_traders(&config, &mut rng)?;
        let index = traders
            .iter()
            .enumerate()
            .map(|(i, trader)| (trader.id().clone(), i))
            .collect();

        let market = Market::new(Price::from_float(config.fundamentalists.mean));

        Ok(Self {
            config,
            market,
            traders,
            index,
            prices: Vec::new(),
            state: RunState::Uninitialized,
            stats: SimulationStats::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Traders in creation order.
    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn trader(&self, id: &str) -> Option<&Trader> {
        self.index.get(id).map(|&i| &self.traders[i])
    }

    /// Book snapshot at the configured depth.
    pub fn snapshot(&self) -> BookSnapshot {
        self.market.snapshot(self.config.snapshot_depth)
    }

    /// Market prices recorded so far, one per trader step.
    pub fn price_history(&self) -> &[Price] {
        &self.prices
    }

    /// Run a single tick.
    ///
    /// Returns the prices recorded during that tick.
    pub fn step(&mut self) -> Result<&[Price]> {
        let tick = match self.state {
            RunState::Uninitialized => {
                info!(
                    ticks = self.config.ticks,
                    traders = self.traders.len(),
                    initial_price = %self.market.initial_price(),
                    "simulation started"
                );
                0
            }
            RunState::Running { tick } => tick,
            RunState::Completed => return Err(SimulationError::AlreadyCompleted),
        };

        let start = self.prices.len();
        self.run_tick(tick);
        Ok(&self.prices[start..])
    }

    /// Run every remaining tick and return the report.
    pub fn run(&mut self) -> SimulationReport {
        while !self.is_completed() {
            // Only a completed run can fail to step.
            if self.step().is_err() {
                break;
            }
        }
        self.build_report()
    }

    /// Final P&L for every trader, in creation order.
    pub fn pnl_snapshot(&self) -> Result<Vec<TraderPnl>> {
        if !self.is_completed() {
            return Err(SimulationError::NotCompleted);
        }
        Ok(self.traders.iter().map(TraderPnl::from_trader).collect())
    }

    /// Report of a completed run.
    pub fn report(&self) -> Result<SimulationReport> {
        if !self.is_completed() {
            return Err(SimulationError::NotCompleted);
        }
        Ok(self.build_report())
    }

    fn build_report(&self) -> SimulationReport {
        SimulationReport {
            prices: self.prices.clone(),
            pnl: self.traders.iter().map(TraderPnl::from_trader).collect(),
            summary: PriceSummary::from_prices(&self.prices),
            stats: self.stats.clone(),
            book: self.snapshot(),
        }
    }

    fn run_tick(&mut self, tick: Tick) {
        for i in 0..self.traders.len() {
            self.trader_step(i);
            self.prices.push(self.market.market_price());
        }

        self.stats.ticks = tick + 1;
        self.state = if tick + 1 >= self.config.ticks {
            info!(
                ticks = self.stats.ticks,
                final_price = %self.market.market_price(),
                executions = self.market.executions(),
                "simulation completed"
            );
            RunState::Completed
        } else {
            RunState::Running { tick: tick + 1 }
        };
    }

    fn trader_step(&mut self, i: usize) {
        let price = self.market.market_price();
        let trader = &mut self.traders[i];

        let order = match trader.decide(price) {
            Ok(order) => order,
            Err(TraderError::Risk(violation)) => {
                self.stats.risk_rejections += 1;
                debug!(trader = %trader.id(), %violation, "order suppressed");
                return;
            }
            Err(TraderError::InvalidOrder(err)) => {
                self.stats.invalid_orders += 1;
                debug!(trader = %trader.id(), error = %err, "order not built");
                return;
            }
        };

        let outcome = match self.market.submit(&order) {
            Ok(outcome) => outcome,
            Err(_) => {
                self.stats.invalid_orders += 1;
                trader.release(&order);
                return;
            }
        };
        self.stats.orders_submitted += 1;

        if outcome.dropped.is_some() {
            self.stats.dropped_market_orders += 1;
            trader.release(&order);
        }
        if !outcome.rested.is_zero() {
            self.stats.resting_submissions += 1;
        }

        self.stats.matches += outcome.matches.len() as u64;
        for fill in &outcome.matches {
            match self.index.get(&fill.trader_id) {
                Some(&j) => self.traders[j].apply_match(fill),
                None => warn!(trader = %fill.trader_id, "match for unknown trader"),
            }
        }
    }
}

/// Draw `abs(round(x))` for `x ~ Normal(mean, sqrt(variance))`, refusing
/// draws above `limit`.
fn draw(
    dist: &Normal<f64>,
    rng: &mut StdRng,
    population: &'static str,
    limit: f64,
) -> Result<u64> {
    let value = dist.sample(rng).round().abs();
    if value > limit {
        return Err(SimulationError::Distribution {
            population,
            reason: format!("draw {value} exceeds the limit of {limit}"),
        });
    }
    Ok(value as u64)
}

fn sampler(population: &TraderPopulation, name: &'static str) -> Result<Normal<f64>> {
    Normal::new(population.mean, population.variance.sqrt()).map_err(|err| {
        SimulationError::Distribution {
            population: name,
            reason: err.to_string(),
        }
    })
}

/// Fundamentalists first, then chartists, each numbered from 1.
fn build_traders(config: &SimulationConfig, rng: &mut StdRng) -> Result<Vec<Trader>> {
    let portfolio = config.portfolio();
    let valuations = sampler(&config.fundamentalists, "fundamentalist")?;
    let windows = sampler(&config.chartists, "chartist")?;

    let mut traders = Vec::with_capacity(config.trader_count());
    for n in 1..=config.fundamentalists.count {
        let units = draw(&valuations, rng, "fundamentalist", MAX_VALUATION)?;
        let valuation = i64::try_from(units)
            .ok()
            .and_then(Price::checked_from_units)
            .ok_or_else(|| SimulationError::Distribution {
                population: "fundamentalist",
                reason: format!("valuation {units} does not fit a price"),
            })?;
        let strategy = Strategy::Valuation(ValuationStrategy::new(ValuationConfig {
            valuation,
            target: config.target,
        }));
        let id = TraderId::numbered(strategy.id_prefix(), n);
        traders.push(Trader::new(id, strategy, portfolio));
    }
    for n in 1..=config.chartists.count {
        let window = draw(&windows, rng, "chartist", MAX_WINDOW as f64)? as usize;
        let strategy = Strategy::Momentum(MomentumStrategy::new(MomentumConfig {
            window,
            target: config.target,
        }));
        let id = TraderId::numbered(strategy.id_prefix(), n);
        traders.push(Trader::new(id, strategy, portfolio));
    }
    Ok(traders)
}
