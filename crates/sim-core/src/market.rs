//! Market wrapper owning the order book and the running market price.
//!
//! The market price is the price of the most recent execution. Until the
//! first execution it falls back to the initial price the market was opened
//! with.

use tracing::{debug, trace, warn};
use types::{BookSnapshot, Order, Price};

use crate::error::Result;
use crate::matching::{MatchingEngine, SubmitOutcome};
use crate::order_book::OrderBook;

#[derive(Debug, Clone)]
pub struct Market {
    book: OrderBook,
    engine: MatchingEngine,
    initial_price: Price,
    last_trade_price: Option<Price>,
}

impl Market {
    /// Open an empty market with a reference price.
    pub fn new(initial_price: Price) -> Self {
        Self {
            book: OrderBook::new(),
            engine: MatchingEngine::new(),
            initial_price,
            last_trade_price: None,
        }
    }

    /// Submit an order synchronously.
    ///
    /// Invalid orders are returned as errors and leave the book untouched.
    /// A market order the book cannot absorb comes back with
    /// [`SubmitOutcome::dropped`] set and no matches.
    pub fn submit(&mut self, order: &Order) -> Result<SubmitOutcome> {
        trace!(%order, "submit");
        let outcome = match self.engine.submit(&mut self.book, order) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(trader = %order.trader_id, error = %err, "order rejected by book");
                return Err(err);
            }
        };

        if let Some(reason) = outcome.dropped {
            debug!(trader = %order.trader_id, ?reason, "market order dropped");
        }
        if let Some(price) = outcome.last_price() {
            self.last_trade_price = Some(price);
        }
        Ok(outcome)
    }

    /// Price of the last execution, or the initial price before any trade.
    pub fn market_price(&self) -> Price {
        self.last_trade_price.unwrap_or(self.initial_price)
    }

    pub fn initial_price(&self) -> Price {
        self.initial_price
    }

    /// Price of the last execution, if any occurred.
    pub fn last_trade_price(&self) -> Option<Price> {
        self.last_trade_price
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Total executions since the market opened.
    pub fn executions(&self) -> u64 {
        self.engine.executions()
    }

    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        self.book.snapshot(depth)
    }
}
