//! Order types for the market simulation.
//!
//! Orders carry a *signed* quantity. The sign decides the book side:
//! a positive quantity rests on (or takes from) the ask side, a negative
//! quantity on the bid side. The same sign is carried into the fills a
//! participant receives and into position accounting.

use crate::ids::TraderId;
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Book Side
// =============================================================================

/// Which half of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    /// Side selected by a signed quantity: positive routes to the ask side.
    pub fn for_quantity(signed_quantity: i64) -> Self {
        if signed_quantity > 0 {
            BookSide::Ask
        } else {
            BookSide::Bid
        }
    }

    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            BookSide::Bid => BookSide::Ask,
            BookSide::Ask => BookSide::Bid,
        }
    }
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => write!(f, "BID"),
            BookSide::Ask => write!(f, "ASK"),
        }
    }
}

// =============================================================================
// Order Kind
// =============================================================================

/// Execution style a strategy asks for, before a price is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStyle {
    Limit,
    Market,
}

/// Type of order determining execution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Take liquidity from the best opposite price outward, all or nothing.
    Market,
    /// Match while crossing, rest the remainder at `price`.
    Limit { price: Price },
}

impl OrderKind {
    pub fn style(&self) -> OrderStyle {
        match self {
            OrderKind::Market => OrderStyle::Market,
            OrderKind::Limit { .. } => OrderStyle::Limit,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit { price } => write!(f, "LIMIT@{}", price),
        }
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Reasons an order cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order quantity must be nonzero")]
    ZeroQuantity,
    #[error("limit order requires a price")]
    MissingLimitPrice,
    #[error("limit price {0} is negative")]
    NegativePrice(Price),
}

// =============================================================================
// Order Struct
// =============================================================================

/// An immutable trading intent submitted by a trader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,
    pub trader_id: TraderId,
    /// Positive routes to the ask side, negative to the bid side. Portfolios
    /// book a positive fill as shares acquired.
    pub signed_quantity: i64,
}

impl Order {
    /// Create a new limit order.
    pub fn limit(trader_id: impl Into<TraderId>, signed_quantity: i64, price: Price) -> Self {
        Self {
            kind: OrderKind::Limit { price },
            trader_id: trader_id.into(),
            signed_quantity,
        }
    }

    /// Create a new market order.
    pub fn market(trader_id: impl Into<TraderId>, signed_quantity: i64) -> Self {
        Self {
            kind: OrderKind::Market,
            trader_id: trader_id.into(),
            signed_quantity,
        }
    }

    /// Validated constructor. A market order ignores any price it is given.
    pub fn try_new(
        style: OrderStyle,
        trader_id: impl Into<TraderId>,
        signed_quantity: i64,
        limit_price: Option<Price>,
    ) -> Result<Self, OrderError> {
        let order = match style {
            OrderStyle::Market => Self::market(trader_id, signed_quantity),
            OrderStyle::Limit => {
                let price = limit_price.ok_or(OrderError::MissingLimitPrice)?;
                Self::limit(trader_id, signed_quantity, price)
            }
        };
        order.validate()?;
        Ok(order)
    }

    /// Check the order's own invariants.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.signed_quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }
        if let OrderKind::Limit { price } = self.kind
            && price.is_negative()
        {
            return Err(OrderError::NegativePrice(price));
        }
        Ok(())
    }

    pub fn side(&self) -> BookSide {
        BookSide::for_quantity(self.signed_quantity)
    }

    /// Unsigned size of the order.
    pub fn quantity(&self) -> Quantity {
        Quantity::from_signed(self.signed_quantity)
    }

    /// Get the limit price if this is a limit order.
    pub fn limit_price(&self) -> Option<Price> {
        match self.kind {
            OrderKind::Limit { price } => Some(price),
            OrderKind::Market => None,
        }
    }

    pub fn is_market(&self) -> bool {
        matches!(self.kind, OrderKind::Market)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:+} ({})",
            self.trader_id,
            self.kind,
            self.signed_quantity,
            self.side()
        )
    }
}
