//! Match events produced by the matching engine.

use crate::ids::TraderId;
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a trade as seen by one participant.
///
/// Every execution produces two matches, one for the incoming trader and one
/// for the resting trader. Each carries the sign of its own order, so the
/// two quantities of an execution always sum to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub trader_id: TraderId,
    /// Execution price (always the resting order's price).
    pub price: Price,
    pub signed_quantity: i64,
}

impl Match {
    pub fn new(trader_id: TraderId, price: Price, signed_quantity: i64) -> Self {
        Self {
            trader_id,
            price,
            signed_quantity,
        }
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::from_signed(self.signed_quantity)
    }

    /// Signed cash value of the fill.
    pub fn notional(&self) -> f64 {
        self.price.notional(self.signed_quantity)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match[{}]: {:+} @ {}",
            self.trader_id, self.signed_quantity, self.price
        )
    }
}
