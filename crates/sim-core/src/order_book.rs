//! Order book with arena-indexed price levels and price-time priority.
//!
//! Each side keeps a sorted array of `(price, slot)` pairs pointing into an
//! arena of [`PriceLevel`]s. Within a level, resting quantity is queued per
//! trader in first-arrival order. A level is released from the arena and the
//! index in the same step that empties it.
//!
//! Side convention: a positive order quantity rests on the ask side and a
//! negative quantity on the bid side. Asks are read lowest first, bids highest
//! first.

use std::collections::VecDeque;

use types::{BookLevel, BookSide, BookSnapshot, Price, Quantity, TraderId};

/// Quantity resting for one trader at one price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestingOrder {
    pub trader_id: TraderId,
    pub quantity: Quantity,
}

/// A price level containing resting quantity at a single price point.
///
/// Entries are kept in arrival order (FIFO). A trader adding to a price it
/// already rests at has the quantity merged into its existing entry, keeping
/// that entry's place in the queue.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    total_quantity: Quantity,
    orders: VecDeque<RestingOrder>,
}

impl PriceLevel {
    /// Create a new empty price level.
    pub fn new(price: Price) -> Self {
        Self {
            price,
            total_quantity: Quantity::ZERO,
            orders: VecDeque::new(),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Total quantity available at this price.
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Add quantity for a trader, merging into its existing entry if present.
    pub fn push(&mut self, trader_id: TraderId, quantity: Quantity) {
        self.total_quantity += quantity;
        if let Some(existing) = self.orders.iter_mut().find(|o| o.trader_id == trader_id) {
            existing.quantity += quantity;
        } else {
            self.orders.push_back(RestingOrder {
                trader_id,
                quantity,
            });
        }
    }

    /// Peek at the earliest-arrived entry.
    pub fn front(&self) -> Option<&RestingOrder> {
        self.orders.front()
    }

    /// Take up to `quantity` from the front entry, removing it once exhausted.
    ///
    /// Returns the trader and the quantity actually taken.
    pub fn fill_front(&mut self, quantity: Quantity) -> Option<(TraderId, Quantity)> {
        let front = self.orders.front_mut()?;
        let taken = front.quantity.min(quantity);
        front.quantity -= taken;
        let trader_id = front.trader_id.clone();
        if front.quantity.is_zero() {
            self.orders.pop_front();
        }
        self.total_quantity = self.total_quantity.saturating_sub(taken);
        Some((trader_id, taken))
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of traders resting at this price.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestingOrder> {
        self.orders.iter()
    }

    fn to_book_level(&self) -> BookLevel {
        BookLevel {
            price: self.price,
            quantity: self.total_quantity,
            order_count: self.orders.len(),
        }
    }
}

// =============================================================================
// One side of the book
// =============================================================================

/// Sorted price index over an arena of levels.
#[derive(Debug, Clone)]
struct BookHalf {
    side: BookSide,
    /// Ascending by price; bids read from the end.
    index: Vec<(Price, usize)>,
    slots: Vec<Option<PriceLevel>>,
    free: Vec<usize>,
}

impl BookHalf {
    fn new(side: BookSide) -> Self {
        Self {
            side,
            index: Vec::new(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn level(&self, slot: usize) -> Option<&PriceLevel> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn level_mut(&mut self, slot: usize) -> Option<&mut PriceLevel> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Index position of the best level.
    fn best_position(&self) -> Option<usize> {
        if self.index.is_empty() {
            return None;
        }
        match self.side {
            BookSide::Ask => Some(0),
            BookSide::Bid => Some(self.index.len() - 1),
        }
    }

    fn best(&self) -> Option<&PriceLevel> {
        let pos = self.best_position()?;
        self.level(self.index[pos].1)
    }

    fn insert(&mut self, price: Price, trader_id: TraderId, quantity: Quantity) {
        match self.index.binary_search_by_key(&price, |(p, _)| *p) {
            Ok(pos) => {
                let slot = self.index[pos].1;
                if let Some(level) = self.level_mut(slot) {
                    level.push(trader_id, quantity);
                }
            }
            Err(pos) => {
                let mut level = PriceLevel::new(price);
                level.push(trader_id, quantity);
                let slot = match self.free.pop() {
                    Some(slot) => {
                        self.slots[slot] = Some(level);
                        slot
                    }
                    None => {
                        self.slots.push(Some(level));
                        self.slots.len() - 1
                    }
                };
                self.index.insert(pos, (price, slot));
            }
        }
    }

    /// Fill against the best level's front entry and release the level if it empties.
    fn fill_best(&mut self, quantity: Quantity) -> Option<(TraderId, Price, Quantity)> {
        let pos = self.best_position()?;
        let (price, slot) = self.index[pos];
        let level = self.level_mut(slot)?;
        let (trader_id, taken) = level.fill_front(quantity)?;
        if level.is_empty() {
            self.index.remove(pos);
            self.slots[slot] = None;
            self.free.push(slot);
        }
        Some((trader_id, price, taken))
    }

    /// Levels from best to worst.
    fn iter_best_first(&self) -> impl Iterator<Item = &PriceLevel> {
        let n = self.index.len();
        let side = self.side;
        (0..n)
            .map(move |k| match side {
                BookSide::Ask => k,
                BookSide::Bid => n - 1 - k,
            })
            .filter_map(move |pos| self.level(self.index[pos].1))
    }

    fn total_quantity(&self) -> Quantity {
        self.iter_best_first().map(|l| l.total_quantity).sum()
    }

    fn live_levels(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Index entries point at live, non-empty levels with matching prices,
    /// every live level is indexed exactly once, and prices strictly ascend.
    fn is_consistent(&self) -> bool {
        let indexed_ok = self.index.iter().all(|(price, slot)| {
            self.level(*slot)
                .is_some_and(|l| l.price == *price && !l.is_empty())
        });
        let sorted = self.index.windows(2).all(|w| w[0].0 < w[1].0);
        indexed_ok && sorted && self.live_levels() == self.index.len()
    }
}

// =============================================================================
// Order Book
// =============================================================================

/// Central limit order book for the single simulated instrument.
#[derive(Debug, Clone)]
pub struct OrderBook {
    bids: BookHalf,
    asks: BookHalf,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty order book.
    pub fn new() -> Self {
        Self {
            bids: BookHalf::new(BookSide::Bid),
            asks: BookHalf::new(BookSide::Ask),
        }
    }

    fn half(&self, side: BookSide) -> &BookHalf {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn half_mut(&mut self, side: BookSide) -> &mut BookHalf {
        match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        }
    }

    /// Rest quantity on a side without matching.
    ///
    /// Callers go through the matching engine, which only rests what no
    /// longer crosses.
    pub fn rest(&mut self, side: BookSide, trader_id: TraderId, price: Price, quantity: Quantity) {
        if quantity.is_zero() {
            return;
        }
        self.half_mut(side).insert(price, trader_id, quantity);
    }

    /// Fill (reduce) the best level of `side` by up to `quantity`.
    ///
    /// Returns the resting trader, the level price and the quantity taken.
    /// Empty levels are removed from the index before returning.
    pub fn fill_best(
        &mut self,
        side: BookSide,
        quantity: Quantity,
    ) -> Option<(TraderId, Price, Quantity)> {
        self.half_mut(side).fill_best(quantity)
    }

    /// Get the best bid level (highest price).
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.best()
    }

    /// Get the best ask level (lowest price).
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.best()
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.best_bid().map(PriceLevel::price)
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.best_ask().map(PriceLevel::price)
    }

    pub fn best_price(&self, side: BookSide) -> Option<Price> {
        self.half(side).best().map(PriceLevel::price)
    }

    /// Calculate the spread between best bid and ask.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Total resting quantity on one side.
    pub fn depth(&self, side: BookSide) -> Quantity {
        self.half(side).total_quantity()
    }

    /// Get total bid depth (volume) up to N levels.
    pub fn bid_depth(&self, levels: usize) -> Quantity {
        self.bids
            .iter_best_first()
            .take(levels)
            .map(|l| l.total_quantity)
            .sum()
    }

    /// Get total ask depth (volume) up to N levels.
    pub fn ask_depth(&self, levels: usize) -> Quantity {
        self.asks
            .iter_best_first()
            .take(levels)
            .map(|l| l.total_quantity)
            .sum()
    }

    /// Ask prices in ascending order.
    pub fn ask_prices(&self) -> Vec<Price> {
        self.asks.index.iter().map(|(p, _)| *p).collect()
    }

    /// Bid prices in ascending order (best bid last).
    pub fn bid_prices(&self) -> Vec<Price> {
        self.bids.index.iter().map(|(p, _)| *p).collect()
    }

    /// Iterate one side's levels from best to worst.
    pub fn levels(&self, side: BookSide) -> impl Iterator<Item = &PriceLevel> {
        self.half(side).iter_best_first()
    }

    /// Number of price levels on the bid side.
    pub fn bid_levels(&self) -> usize {
        self.bids.index.len()
    }

    /// Number of price levels on the ask side.
    pub fn ask_levels(&self) -> usize {
        self.asks.index.len()
    }

    /// Total number of resting entries in the book.
    pub fn order_count(&self) -> usize {
        self.levels(BookSide::Bid)
            .chain(self.levels(BookSide::Ask))
            .map(PriceLevel::order_count)
            .sum()
    }

    /// Check if the book has any orders.
    pub fn is_empty(&self) -> bool {
        self.bids.index.is_empty() && self.asks.index.is_empty()
    }

    /// Get a snapshot of the current book state, `depth` levels per side.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            bids: self
                .levels(BookSide::Bid)
                .take(depth)
                .map(PriceLevel::to_book_level)
                .collect(),
            asks: self
                .levels(BookSide::Ask)
                .take(depth)
                .map(PriceLevel::to_book_level)
                .collect(),
        }
    }

    /// Structural check: indices agree with live levels on both sides and
    /// the book is not crossed.
    pub fn is_consistent(&self) -> bool {
        let uncrossed = match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => ask > bid,
            _ => true,
        };
        self.bids.is_consistent() && self.asks.is_consistent() && uncrossed
    }
}
