//! Portfolio manager: sizing, reservation-based risk checks and fill bookkeeping.
//!
//! A target fraction becomes a signed share count against the current mark:
//! `size = floor(cash * target / (mark * margin))`. Accepted sizes reserve
//! cash (buys) or stock (sells) until fills arrive, so that several in-flight
//! orders cannot spend the same balance twice.

use serde::{Deserialize, Serialize};
use tracing::debug;
use types::Price;

use crate::error::RiskViolation;
use crate::pnl::PositionPnl;

/// Largest share count a single order may carry.
pub const MAX_ORDER_SIZE: i64 = 1_000_000_000;

/// Starting balances and leverage for one trader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub cash: f64,
    pub stock: i64,
    pub margin: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            cash: 10_000.0,
            stock: 100,
            margin: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    cash: f64,
    stock: i64,
    margin: f64,
    /// Cash reserved by accepted buy orders.
    outstanding_cash: f64,
    /// Shares reserved by accepted sell orders.
    outstanding_stock: i64,
    mark: f64,
    pnl: PositionPnl,
}

impl Portfolio {
    /// Starting stock enters the position at price zero.
    pub fn new(config: PortfolioConfig) -> Self {
        Self {
            cash: config.cash,
            stock: config.stock,
            margin: config.margin,
            outstanding_cash: 0.0,
            outstanding_stock: 0,
            mark: 0.0,
            pnl: PositionPnl::with_inventory(config.stock, 0.0),
        }
    }

    /// Mark the position to a new market price.
    pub fn observe_price(&mut self, price: Price) {
        self.mark = price.to_float();
        self.pnl.observe(self.mark);
    }

    /// Size and risk-check a target fraction, reserving what it needs.
    ///
    /// Returns the signed share count: positive to buy, negative to sell.
    pub fn request(&mut self, target: f64) -> Result<i64, RiskViolation> {
        if target == 0.0 {
            return Err(RiskViolation::ZeroTarget);
        }
        if !(target > -1.0 && target < 1.0) {
            return Err(RiskViolation::TargetOutOfRange(target));
        }
        if self.mark <= 0.0 {
            return Err(RiskViolation::NoMarkPrice);
        }

        let raw = (self.cash * target / (self.mark * self.margin)).floor();
        if !raw.is_finite() || raw.abs() > MAX_ORDER_SIZE as f64 {
            return Err(RiskViolation::AboveMaximumSize {
                size: raw,
                max: MAX_ORDER_SIZE,
            });
        }
        let size = raw as i64;
        if size == 0 {
            return Err(RiskViolation::BelowMinimumSize);
        }

        if size > 0 {
            let notional = size as f64 * self.mark;
            let required = self.outstanding_cash + notional;
            if self.cash < required {
                return Err(RiskViolation::InsufficientCash {
                    required,
                    available: self.cash,
                });
            }
            self.outstanding_cash += notional;
        } else {
            let required = self.outstanding_stock - size;
            if self.stock < required {
                return Err(RiskViolation::InsufficientStock {
                    required,
                    available: self.stock,
                });
            }
            self.outstanding_stock = required;
        }
        Ok(size)
    }

    /// Return the reservation of an order that will never fill.
    pub fn release(&mut self, size: i64) {
        if size > 0 {
            self.outstanding_cash = (self.outstanding_cash - size as f64 * self.mark).max(0.0);
        } else {
            self.outstanding_stock = (self.outstanding_stock + size).max(0);
        }
        debug!(size, "reservation released");
    }

    /// Book a fill of `quantity` shares (positive bought, negative sold).
    pub fn apply_fill(&mut self, price: Price, quantity: i64) {
        self.pnl.push(price.to_float(), quantity);
        let notional = price.notional(quantity);
        self.cash -= notional;
        self.stock += quantity;

        if quantity > 0 {
            self.outstanding_cash = (self.outstanding_cash - notional).max(0.0);
        } else if quantity < 0 {
            self.outstanding_stock = (self.outstanding_stock + quantity).max(0);
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn outstanding_cash(&self) -> f64 {
        self.outstanding_cash
    }

    pub fn outstanding_stock(&self) -> i64 {
        self.outstanding_stock
    }

    pub fn mark(&self) -> f64 {
        self.mark
    }

    pub fn pnl(&self) -> &PositionPnl {
        &self.pnl
    }
}
