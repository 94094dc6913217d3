//! Matching engine implementing price-time priority.
//!
//! The matching engine processes incoming orders against the order book,
//! executing at the resting order's price and emitting one [`Match`] per
//! participant per execution.

use serde::{Deserialize, Serialize};
use tracing::trace;
use types::{BookSide, Match, Order, OrderKind, Price, Quantity};

use crate::error::Result;
use crate::order_book::OrderBook;

/// Why a market order produced no matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// The opposite side had no resting orders.
    EmptyBook,
    /// The opposite side could not absorb the whole order.
    InsufficientDepth {
        requested: Quantity,
        available: Quantity,
    },
}

/// Result of submitting one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Matches in execution order: resting participant first, then incoming.
    pub matches: Vec<Match>,
    /// Quantity of a limit order left resting on its own side.
    pub rested: Quantity,
    /// Set when a market order was dropped without touching the book.
    pub dropped: Option<DropReason>,
}

impl SubmitOutcome {
    /// Check if any executions occurred.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Price of the last execution, if any.
    pub fn last_price(&self) -> Option<Price> {
        self.matches.last().map(|m| m.price)
    }

    /// Quantity the incoming order executed.
    pub fn filled_quantity(&self) -> Quantity {
        // Every execution emits a pair; count the incoming half.
        self.matches.iter().skip(1).step_by(2).map(Match::quantity).sum()
    }
}

/// Matching engine for executing orders against an order book.
///
/// Implements price-time priority matching:
/// - Incoming asks match the highest bids first
/// - Incoming bids match the lowest asks first
/// - Within a price level, entries are matched in FIFO order
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    executions: u64,
}

impl MatchingEngine {
    /// Create a new matching engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of executions performed so far.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    /// Process an incoming order against the order book.
    ///
    /// Limit orders match while they cross and rest any remainder. Market
    /// orders either fill completely against the opposite side or are
    /// dropped with no matches.
    pub fn submit(&mut self, book: &mut OrderBook, order: &Order) -> Result<SubmitOutcome> {
        order.validate()?;

        let outcome = match order.kind {
            OrderKind::Limit { price } => self.match_limit(book, order, price),
            OrderKind::Market => self.match_market(book, order),
        };
        Ok(outcome)
    }

    fn match_limit(&mut self, book: &mut OrderBook, order: &Order, limit: Price) -> SubmitOutcome {
        let mut outcome = SubmitOutcome::default();
        let remaining = self.take_liquidity(book, order, order.quantity(), Some(limit), &mut outcome);

        if !remaining.is_zero() {
            book.rest(order.side(), order.trader_id.clone(), limit, remaining);
            outcome.rested = remaining;
        }
        outcome
    }

    fn match_market(&mut self, book: &mut OrderBook, order: &Order) -> SubmitOutcome {
        let mut outcome = SubmitOutcome::default();
        let opposite = order.side().opposite();
        let requested = order.quantity();
        let available = book.depth(opposite);

        if available.is_zero() {
            outcome.dropped = Some(DropReason::EmptyBook);
            return outcome;
        }
        if available < requested {
            outcome.dropped = Some(DropReason::InsufficientDepth {
                requested,
                available,
            });
            return outcome;
        }

        self.take_liquidity(book, order, requested, None, &mut outcome);
        outcome
    }

    /// Consume the opposite side from its best price outward while the order
    /// crosses. Returns the unfilled quantity.
    fn take_liquidity(
        &mut self,
        book: &mut OrderBook,
        order: &Order,
        mut remaining: Quantity,
        limit: Option<Price>,
        outcome: &mut SubmitOutcome,
    ) -> Quantity {
        let side = order.side();
        let opposite = side.opposite();

        while !remaining.is_zero() {
            let Some(best) = book.best_price(opposite) else {
                break; // Opposite side exhausted
            };

            if let Some(limit) = limit
                && !crosses(side, limit, best)
            {
                break;
            }

            let Some((resting_id, price, taken)) = book.fill_best(opposite, remaining) else {
                break;
            };

            trace!(
                resting = %resting_id,
                incoming = %order.trader_id,
                %price,
                quantity = taken.raw(),
                "execution"
            );

            outcome
                .matches
                .push(Match::new(resting_id, price, taken.signed(side_sign(opposite))));
            outcome.matches.push(Match::new(
                order.trader_id.clone(),
                price,
                taken.signed(order.signed_quantity),
            ));
            remaining -= taken;
            self.executions += 1;
        }

        remaining
    }
}

/// An ask crosses at or below the best bid; a bid at or above the best ask.
fn crosses(side: BookSide, limit: Price, opposite_best: Price) -> bool {
    match side {
        BookSide::Ask => limit <= opposite_best,
        BookSide::Bid => limit >= opposite_best,
    }
}

/// Sign carried by quantity resting on `side`.
fn side_sign(side: BookSide) -> i64 {
    match side {
        BookSide::Ask => 1,
        BookSide::Bid => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use types::{OrderError, TraderId};

    use crate::error::SimCoreError;

    fn px(units: i64) -> Price {
        Price::from_units(units)
    }

    fn fills(outcome: &SubmitOutcome) -> Vec<(&str, Price, i64)> {
        outcome
            .matches
            .iter()
            .map(|m| (m.trader_id.as_str(), m.price, m.signed_quantity))
            .collect()
    }

    #[test]
    fn test_no_match_empty_book() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        let outcome = engine
            .submit(&mut book, &Order::limit("a", -50, px(100)))
            .unwrap();

        assert!(!outcome.has_matches());
        assert_eq!(outcome.rested, 50);
        assert_eq!(book.best_bid_price(), Some(px(100)));
    }

    #[test]
    fn test_crossing_limit_executes_at_resting_price() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("A", -5, px(100)))
            .unwrap();
        let outcome = engine
            .submit(&mut book, &Order::limit("B", 5, px(99)))
            .unwrap();

        assert_eq!(fills(&outcome), vec![("A", px(100), -5), ("B", px(100), 5)]);
        assert!(book.is_empty());
        assert!(book.is_consistent());
        assert_eq!(outcome.last_price(), Some(px(100)));
    }

    #[test]
    fn test_partial_match_rests_remainder() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("a", 3, px(100)))
            .unwrap();
        let outcome = engine
            .submit(&mut book, &Order::limit("b", -10, px(101)))
            .unwrap();

        assert_eq!(fills(&outcome), vec![("a", px(100), 3), ("b", px(100), -3)]);
        assert_eq!(outcome.rested, 7);
        assert_eq!(outcome.filled_quantity(), 3);
        assert_eq!(book.best_bid_price(), Some(px(101)));
        assert_eq!(book.best_ask_price(), None);
    }

    #[test]
    fn test_resting_reduced_in_place() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("a", -10, px(100)))
            .unwrap();
        engine
            .submit(&mut book, &Order::limit("b", 4, px(100)))
            .unwrap();

        let level = book.best_bid().unwrap();
        assert_eq!(level.front().unwrap().trader_id, TraderId::from("a"));
        assert_eq!(level.total_quantity(), 6);
    }

    #[test]
    fn test_match_multiple_levels() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("a", 10, px(100)))
            .unwrap();
        engine
            .submit(&mut book, &Order::limit("b", 10, px(101)))
            .unwrap();
        engine
            .submit(&mut book, &Order::limit("c", 10, px(103)))
            .unwrap();

        let outcome = engine
            .submit(&mut book, &Order::limit("d", -25, px(102)))
            .unwrap();

        assert_eq!(
            fills(&outcome),
            vec![
                ("a", px(100), 10),
                ("d", px(100), -10),
                ("b", px(101), 10),
                ("d", px(101), -10),
            ]
        );
        assert_eq!(outcome.rested, 5);
        assert_eq!(book.best_bid_price(), Some(px(102)));
        assert_eq!(book.best_ask_price(), Some(px(103)));
        assert!(book.is_consistent());
    }

    #[test]
    fn test_time_priority() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("first", -5, px(100)))
            .unwrap();
        engine
            .submit(&mut book, &Order::limit("second", -5, px(100)))
            .unwrap();

        let outcome = engine
            .submit(&mut book, &Order::limit("x", 5, px(100)))
            .unwrap();
        assert_eq!(outcome.matches[0].trader_id, TraderId::from("first"));
        assert_eq!(
            book.best_bid().unwrap().front().unwrap().trader_id,
            TraderId::from("second")
        );
    }

    #[test]
    fn test_limit_price_respected() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        engine
            .submit(&mut book, &Order::limit("a", -5, px(98)))
            .unwrap();
        let outcome = engine
            .submit(&mut book, &Order::limit("b", 5, px(99)))
            .unwrap();

        // Ask at 99 does not cross a bid at 98
        assert!(!outcome.has_matches());
        assert_eq!(book.spread(), Some(px(1)));
    }

    #[test]
    fn test_market_order_empty_side_dropped() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();
        engine
            .submit(&mut book, &Order::limit("a", 5, px(100)))
            .unwrap();

        let outcome = engine.submit(&mut book, &Order::market("C", 10)).unwrap();

        assert!(!outcome.has_matches());
        assert_eq!(outcome.dropped, Some(DropReason::EmptyBook));
        assert_eq!(book.depth(BookSide::Ask), 5);
        assert_eq!(book.bid_levels(), 0);
    }

    #[test]
    fn test_market_order_insufficient_depth_is_all_or_nothing() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();
        engine
            .submit(&mut book, &Order::limit("a", -4, px(100)))
            .unwrap();

        let outcome = engine.submit(&mut book, &Order::market("c", 10)).unwrap();

        assert_eq!(
            outcome.dropped,
            Some(DropReason::InsufficientDepth {
                requested: Quantity(10),
                available: Quantity(4),
            })
        );
        assert_eq!(book.depth(BookSide::Bid), 4);
    }

    #[test]
    fn test_market_order_sweeps_levels() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();
        engine
            .submit(&mut book, &Order::limit("a", 4, px(100)))
            .unwrap();
        engine
            .submit(&mut book, &Order::limit("b", 6, px(105)))
            .unwrap();

        let outcome = engine.submit(&mut book, &Order::market("c", -8)).unwrap();

        assert_eq!(
            fills(&outcome),
            vec![
                ("a", px(100), 4),
                ("c", px(100), -4),
                ("b", px(105), 4),
                ("c", px(105), -4),
            ]
        );
        assert_eq!(outcome.dropped, None);
        assert_eq!(outcome.rested, 0);
        assert_eq!(book.depth(BookSide::Ask), 2);
        assert_eq!(engine.executions(), 2);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        let err = engine
            .submit(&mut book, &Order::limit("a", 0, px(100)))
            .unwrap_err();
        assert_eq!(
            err,
            SimCoreError::InvalidOrder {
                reason: OrderError::ZeroQuantity
            }
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_resting_never_fills_worse_than_limit() {
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        for (i, units) in [97, 99, 101].iter().enumerate() {
            engine
                .submit(&mut book, &Order::limit(format!("bid_{i}"), -3, px(*units)))
                .unwrap();
        }
        let outcome = engine.submit(&mut book, &Order::market("m", 9)).unwrap();

        for m in outcome.matches.iter().filter(|m| m.signed_quantity < 0) {
            let limit = match m.trader_id.as_str() {
                "bid_0" => px(97),
                "bid_1" => px(99),
                _ => px(101),
            };
            assert_eq!(m.price, limit);
        }
        assert!(book.is_empty());
    }

    #[test]
    fn test_random_order_flow_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut book = OrderBook::new();
        let mut engine = MatchingEngine::new();

        for step in 0..5_000 {
            let trader = format!("t{}", rng.gen_range(0..8));
            let size = rng.gen_range(1..=20_i64);
            let signed = if rng.gen_bool(0.5) { size } else { -size };
            let order = if rng.gen_bool(0.7) {
                Order::limit(trader, signed, px(rng.gen_range(95..=105)))
            } else {
                Order::market(trader, signed)
            };

            let outcome = engine.submit(&mut book, &order).unwrap();
            assert!(book.is_consistent(), "step {step}: {order:?} left {book:?}");

            assert_eq!(outcome.matches.len() % 2, 0);
            for pair in outcome.matches.chunks(2) {
                let (resting, incoming) = (&pair[0], &pair[1]);
                assert_eq!(resting.signed_quantity + incoming.signed_quantity, 0);
                assert_eq!(resting.price, incoming.price);
                assert_eq!(incoming.trader_id, order.trader_id);
                assert_eq!(incoming.signed_quantity.signum(), signed.signum());
                if let Some(limit) = order.limit_price() {
                    assert!(crosses(order.side(), limit, incoming.price));
                }
            }

            let filled = outcome.filled_quantity().raw();
            match order.kind {
                OrderKind::Limit { .. } => {
                    assert_eq!(filled + outcome.rested.raw(), size as u64);
                    assert_eq!(outcome.dropped, None);
                }
                OrderKind::Market if outcome.dropped.is_some() => {
                    assert!(outcome.matches.is_empty());
                }
                OrderKind::Market => assert_eq!(filled, size as u64),
            }
        }
    }
}
