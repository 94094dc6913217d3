//! A trader: one strategy driving one portfolio.

use tracing::trace;
use types::{Match, Order, Price, TraderId};

use crate::error::{Result, TraderError};
use crate::portfolio::{Portfolio, PortfolioConfig};
use crate::strategies::Strategy;

#[derive(Debug, Clone)]
pub struct Trader {
    id: TraderId,
    strategy: Strategy,
    portfolio: Portfolio,
}

impl Trader {
    pub fn new(id: TraderId, strategy: Strategy, portfolio: PortfolioConfig) -> Self {
        Self {
            id,
            strategy,
            portfolio: Portfolio::new(portfolio),
        }
    }

    pub fn id(&self) -> &TraderId {
        &self.id
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Observe the market price and decide on an order.
    ///
    /// A risk rejection or an unbuildable order yields an error and leaves
    /// no reservation behind.
    pub fn decide(&mut self, market_price: Price) -> Result<Order> {
        self.portfolio.observe_price(market_price);
        let target = self.strategy.signal(market_price);
        let size = self.portfolio.request(target)?;

        match Order::try_new(
            self.strategy.order_style(),
            self.id.clone(),
            size,
            self.strategy.limit_price(),
        ) {
            Ok(order) => {
                trace!(trader = %self.id, target, size, "order built");
                Ok(order)
            }
            Err(err) => {
                self.portfolio.release(size);
                Err(TraderError::InvalidOrder(err))
            }
        }
    }

    /// Book a match addressed to this trader.
    pub fn apply_match(&mut self, fill: &Match) {
        debug_assert_eq!(fill.trader_id, self.id);
        self.portfolio.apply_fill(fill.price, fill.signed_quantity);
    }

    /// Undo the reservation of an order the market dropped.
    pub fn release(&mut self, order: &Order) {
        self.portfolio.release(order.signed_quantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskViolation;
    use crate::strategies::{MomentumConfig, MomentumStrategy, ValuationConfig, ValuationStrategy};
    use types::{BookSide, OrderKind};

    fn fundamentalist() -> Trader {
        Trader::new(
            TraderId::from("fundamentalist_1"),
            Strategy::Valuation(ValuationStrategy::new(ValuationConfig::default())),
            PortfolioConfig::default(),
        )
    }

    #[test]
    fn test_valuation_trader_builds_limits_both_ways() {
        let mut trader = fundamentalist();

        let buy = trader.decide(Price::from_units(90)).unwrap();
        assert_eq!(
            buy.kind,
            OrderKind::Limit {
                price: Price::from_units(100)
            }
        );
        assert!(buy.signed_quantity > 0);
        assert_eq!(buy.side(), BookSide::Ask);

        let sell = trader.decide(Price::from_units(110)).unwrap();
        assert!(sell.signed_quantity < 0);
        assert_eq!(sell.side(), BookSide::Bid);
        assert_eq!(sell.limit_price(), Some(Price::from_units(100)));
    }

    #[test]
    fn test_momentum_trader_builds_market_orders() {
        let mut trader = Trader::new(
            TraderId::from("chartist_1"),
            Strategy::Momentum(MomentumStrategy::new(MomentumConfig::default())),
            PortfolioConfig::default(),
        );
        let order = trader.decide(Price::from_units(100)).unwrap();
        assert!(order.is_market());
        assert_eq!(order.signed_quantity, -30);
    }

    #[test]
    fn test_risk_rejection_surfaces() {
        let mut trader = fundamentalist();
        let err = trader.decide(Price::ZERO).unwrap_err();
        assert_eq!(err, TraderError::Risk(RiskViolation::NoMarkPrice));
    }

    #[test]
    fn test_apply_match_and_release() {
        let mut trader = fundamentalist();
        let order = trader.decide(Price::from_units(90)).unwrap();
        trader.release(&order);
        assert_eq!(trader.portfolio().outstanding_cash(), 0.0);

        let fill = Match::new(trader.id().clone(), Price::from_units(95), 10);
        trader.apply_match(&fill);
        assert_eq!(trader.portfolio().stock(), 110);
    }
}
