//! End-of-run output: price history, per-trader P&L and summary statistics.

use agents::Trader;
use quant::stats::returns;
use quant::{CumulativeStatistics, Oscillators};
use serde::{Deserialize, Serialize};
use types::{BookSnapshot, Price, TraderId};

use crate::runner::SimulationStats;

/// Final accounting for one trader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderPnl {
    pub trader_id: TraderId,
    pub total: f64,
    pub realized: f64,
    pub unrealized: f64,
    pub cash: f64,
    pub stock: i64,
}

impl TraderPnl {
    pub fn from_trader(trader: &Trader) -> Self {
        let portfolio = trader.portfolio();
        let pnl = portfolio.pnl();
        Self {
            trader_id: trader.id().clone(),
            total: pnl.total_pnl(),
            realized: pnl.realized_pnl(),
            unrealized: pnl.unrealized_pnl(),
            cash: portfolio.cash(),
            stock: portfolio.stock(),
        }
    }
}

/// Descriptive statistics of a price path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub last: Option<f64>,
    /// Mean of step-to-step simple returns.
    pub returns_mean: Option<f64>,
    pub returns_stddev: Option<f64>,
    /// RSI(14) at the end of the path.
    pub rsi: Option<f64>,
    /// MACD(12, 26) line at the end of the path.
    pub macd: Option<f64>,
    /// MACD line minus its 9-step signal EMA.
    pub macd_histogram: Option<f64>,
}

impl PriceSummary {
    pub fn from_prices(prices: &[Price]) -> Self {
        let levels: Vec<f64> = prices.iter().map(|p| p.to_float()).collect();
        let moments: CumulativeStatistics = levels.iter().copied().collect();
        let step_returns: CumulativeStatistics = returns(&levels).into_iter().collect();

        let mut oscillators = Oscillators::default();
        for &level in &levels {
            oscillators.push(level);
        }

        Self {
            count: prices.len(),
            mean: moments.mean(),
            stddev: moments.std_dev(),
            min: prices.iter().min().map(|p| p.to_float()),
            max: prices.iter().max().map(|p| p.to_float()),
            last: levels.last().copied(),
            returns_mean: step_returns.mean(),
            returns_stddev: step_returns.std_dev(),
            rsi: oscillators.rsi(),
            macd: oscillators.macd(),
            macd_histogram: oscillators.macd_histogram(),
        }
    }
}

/// Everything a completed run exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Market price after every trader step, in order.
    pub prices: Vec<Price>,
    /// One row per trader in creation order.
    pub pnl: Vec<TraderPnl>,
    pub summary: PriceSummary,
    pub stats: SimulationStats,
    /// Resting liquidity left on the book when the run ended.
    pub book: BookSnapshot,
}

impl SimulationReport {
    pub fn trader(&self, id: &str) -> Option<&TraderPnl> {
        self.pnl.iter().find(|row| row.trader_id.as_str() == id)
    }

    /// Sum of every trader's total P&L.
    pub fn aggregate_pnl(&self) -> f64 {
        self.pnl.iter().map(|row| row.total).sum()
    }
}
