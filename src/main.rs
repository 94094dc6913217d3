//! Market Sim - command line runner.
//!
//! Builds a simulation from CLI arguments (each with a `SIM_*` environment
//! fallback), runs it to completion and writes the results to stdout:
//!
//! - text (default): the price history, one price per trader step, followed
//!   by a P&L table and a summary of the path and the closing book
//! - `--json`: the full [`SimulationReport`] as JSON
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use simulation::{Simulation, SimulationConfig, SimulationReport, TraderPopulation};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Market Sim - agent-based artificial stock market
#[derive(Parser, Debug)]
#[command(name = "market-sim")]
#[command(about = "Fundamentalists and chartists trading through a limit order book")]
#[command(version)]
struct Args {
    /// Number of ticks; every trader acts once per tick
    #[arg(long, env = "SIM_TICKS")]
    ticks: Option<u64>,

    /// Number of fundamentalists (valuation traders)
    #[arg(long, env = "SIM_FUNDAMENTALISTS")]
    fundamentalists: Option<usize>,

    /// Mean valuation; also the opening market price
    #[arg(long, env = "SIM_VALUATION_MEAN")]
    valuation_mean: Option<f64>,

    /// Variance of the valuation draw (the standard deviation is its square root)
    #[arg(long, env = "SIM_VALUATION_VARIANCE")]
    valuation_variance: Option<f64>,

    /// Number of chartists (momentum traders)
    #[arg(long, env = "SIM_CHARTISTS")]
    chartists: Option<usize>,

    /// Mean momentum window length
    #[arg(long, env = "SIM_WINDOW_MEAN")]
    window_mean: Option<f64>,

    /// Variance of the window length draw (the standard deviation is its square root)
    #[arg(long, env = "SIM_WINDOW_VARIANCE")]
    window_variance: Option<f64>,

    /// Starting cash per trader
    #[arg(long, env = "SIM_CASH")]
    cash: Option<f64>,

    /// Starting shares per trader
    #[arg(long, env = "SIM_STOCK")]
    stock: Option<i64>,

    /// RNG seed for reproducible runs
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Write the report as JSON
    #[arg(long, env = "SIM_JSON")]
    json: bool,

    /// Omit the price history from text output
    #[arg(long)]
    summary_only: bool,
}

/// Apply CLI/env overrides on top of the defaults.
fn build_config(args: &Args) -> SimulationConfig {
    let defaults = SimulationConfig::default();
    let mut config = defaults.clone();

    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    config.fundamentalists = TraderPopulation::new(
        args.fundamentalists.unwrap_or(defaults.fundamentalists.count),
        args.valuation_mean.unwrap_or(defaults.fundamentalists.mean),
        args.valuation_variance
            .unwrap_or(defaults.fundamentalists.variance),
    );
    config.chartists = TraderPopulation::new(
        args.chartists.unwrap_or(defaults.chartists.count),
        args.window_mean.unwrap_or(defaults.chartists.mean),
        args.window_variance.unwrap_or(defaults.chartists.variance),
    );
    if let Some(cash) = args.cash {
        config.cash = cash;
    }
    if let Some(stock) = args.stock {
        config.stock = stock;
    }
    config.seed = args.seed;
    config
}

fn write_text(out: &mut impl Write, report: &SimulationReport, with_prices: bool) -> io::Result<()> {
    if with_prices {
        writeln!(out, "# market prices")?;
        for (step, price) in report.prices.iter().enumerate() {
            writeln!(out, "{step}\t{:.4}", price.to_float())?;
        }
        writeln!(out)?;
    }

    writeln!(out, "# pnl")?;
    writeln!(
        out,
        "{:<20} {:>14} {:>14} {:>14} {:>14} {:>8}",
        "trader", "total", "realized", "unrealized", "cash", "stock"
    )?;
    for row in &report.pnl {
        writeln!(
            out,
            "{:<20} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>8}",
            row.trader_id, row.total, row.realized, row.unrealized, row.cash, row.stock
        )?;
    }
    writeln!(out, "{:<20} {:>14.2}", "aggregate", report.aggregate_pnl())?;
    writeln!(out)?;

    let summary = &report.summary;
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
    writeln!(out, "# summary")?;
    writeln!(out, "steps:          {}", summary.count)?;
    writeln!(out, "last price:     {}", fmt(summary.last))?;
    writeln!(out, "mean price:     {}", fmt(summary.mean))?;
    writeln!(out, "price stddev:   {}", fmt(summary.stddev))?;
    writeln!(out, "min / max:      {} / {}", fmt(summary.min), fmt(summary.max))?;
    writeln!(out, "return mean:    {}", fmt(summary.returns_mean))?;
    writeln!(out, "return stddev:  {}", fmt(summary.returns_stddev))?;
    writeln!(out, "rsi / macd:     {} / {}", fmt(summary.rsi), fmt(summary.macd))?;
    writeln!(out, "macd histogram: {}", fmt(summary.macd_histogram))?;

    let book = &report.book;
    let best_bid = fmt(book.best_bid().map(|p| p.to_float()));
    let best_ask = fmt(book.best_ask().map(|p| p.to_float()));
    writeln!(out, "best bid / ask: {best_bid} / {best_ask}")?;
    writeln!(out, "spread:         {}", fmt(book.spread().map(|p| p.to_float())))?;

    let stats = &report.stats;
    writeln!(out, "orders:         {}", stats.orders_submitted)?;
    writeln!(out, "risk rejected:  {}", stats.risk_rejections)?;
    writeln!(out, "dropped market: {}", stats.dropped_market_orders)?;
    writeln!(out, "matches:        {}", stats.matches)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            error!(error = %err, "cannot start simulation");
            return ExitCode::FAILURE;
        }
    };
    let report = sim.run();

    let mut out = BufWriter::new(io::stdout().lock());
    let written = if args.json {
        serde_json::to_writer_pretty(&mut out, &report)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out))
    } else {
        write_text(&mut out, &report, !args.summary_only)
    };

    match written.and_then(|()| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "failed to write report");
            ExitCode::FAILURE
        }
    }
}
