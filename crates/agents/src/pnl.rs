//! Position and P&L accounting with a weighted-average entry price.
//!
//! Every update is a `(price, delta)` pair. The price becomes the new mark;
//! the delta is classified against the current position:
//!
//! | Transition | When | Effect |
//! |---|---|---|
//! | Increase | same sign, flat position or zero delta | `avg += delta / new_total * (price - avg)` |
//! | Decrease | opposite sign, `|delta| < |total|` | `realized += (price - avg) * -delta`, avg unchanged |
//! | Flatten | opposite sign, `|delta| == |total|` | realize as Decrease, reset avg and unrealized |
//! | Flip | opposite sign, `|delta| > |total|` | realize the old position, open the residual at `price` |
//!
//! Unrealized P&L is always `(mark - avg) * total` afterwards.

use serde::{Deserialize, Serialize};

/// How an update changed the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Increase,
    Decrease,
    Flatten,
    Flip,
}

impl Transition {
    /// Classify a delta against the current position.
    ///
    /// A flat position takes the sign of the delta and a zero delta takes
    /// the sign of the position, so both are increases.
    pub fn classify(total_quantity: i64, delta: i64) -> Self {
        if total_quantity == 0 || delta == 0 || total_quantity.signum() == delta.signum() {
            return Transition::Increase;
        }
        match delta.unsigned_abs().cmp(&total_quantity.unsigned_abs()) {
            std::cmp::Ordering::Less => Transition::Decrease,
            std::cmp::Ordering::Equal => Transition::Flatten,
            std::cmp::Ordering::Greater => Transition::Flip,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionPnl {
    total_quantity: i64,
    avg_entry_price: f64,
    realized_pnl: f64,
    unrealized_pnl: f64,
    mark: f64,
}

impl PositionPnl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with starting inventory acquired at `price`.
    pub fn with_inventory(quantity: i64, price: f64) -> Self {
        let mut pnl = Self::new();
        pnl.push(price, quantity);
        pnl
    }

    /// Apply a fill of `delta` shares at `price` (also the new mark).
    pub fn push(&mut self, price: f64, delta: i64) -> Transition {
        self.mark = price;
        let transition = Transition::classify(self.total_quantity, delta);

        match transition {
            Transition::Increase => {
                if delta != 0 {
                    self.total_quantity += delta;
                    self.avg_entry_price +=
                        (delta as f64 / self.total_quantity as f64) * (price - self.avg_entry_price);
                }
            }
            Transition::Decrease => {
                self.realize(price, delta);
                self.total_quantity += delta;
            }
            Transition::Flatten => {
                self.realize(price, delta);
                self.total_quantity = 0;
                self.avg_entry_price = 0.0;
            }
            Transition::Flip => {
                self.realize(price, -self.total_quantity);
                self.total_quantity += delta;
                self.avg_entry_price = price;
            }
        }

        self.unrealized_pnl = (self.mark - self.avg_entry_price) * self.total_quantity as f64;
        transition
    }

    /// Re-mark the position without trading.
    pub fn observe(&mut self, price: f64) {
        self.push(price, 0);
    }

    fn realize(&mut self, price: f64, delta: i64) {
        self.realized_pnl += (price - self.avg_entry_price) * -(delta as f64);
    }

    pub fn total_quantity(&self) -> i64 {
        self.total_quantity
    }

    pub fn avg_entry_price(&self) -> f64 {
        self.avg_entry_price
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.unrealized_pnl
    }

    pub fn mark(&self) -> f64 {
        self.mark
    }

    pub fn total_pnl(&self) -> f64 {
        self.realized_pnl + self.unrealized_pnl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-9;

    /// Independent cost-basis bookkeeping over the same fills.
    fn replay(fills: &[(f64, i64)], mark: f64) -> (f64, f64) {
        let mut position: i64 = 0;
        let mut cost: f64 = 0.0; // entry notional of the open position
        let mut realized = 0.0;

        for &(price, delta) in fills {
            if position == 0 || position.signum() == delta.signum() {
                position += delta;
                cost += price * delta as f64;
                continue;
            }
            let closing = delta.unsigned_abs().min(position.unsigned_abs()) as i64;
            let avg = cost / position as f64;
            let closed = closing * position.signum();
            realized += (price - avg) * closed as f64;
            cost -= avg * closed as f64;
            position -= closed;

            let residual = delta + closed;
            if residual != 0 {
                position = residual;
                cost = price * residual as f64;
            }
            if position == 0 {
                cost = 0.0;
            }
        }
        let unrealized = mark * position as f64 - cost;
        (realized, unrealized)
    }

    #[test]
    fn test_classification() {
        assert_eq!(Transition::classify(0, 5), Transition::Increase);
        assert_eq!(Transition::classify(5, 0), Transition::Increase);
        assert_eq!(Transition::classify(-5, -1), Transition::Increase);
        assert_eq!(Transition::classify(5, -3), Transition::Decrease);
        assert_eq!(Transition::classify(5, -5), Transition::Flatten);
        assert_eq!(Transition::classify(-5, 8), Transition::Flip);
    }

    #[test]
    fn test_increase_updates_average() {
        let mut pnl = PositionPnl::new();
        pnl.push(10.0, 100);
        pnl.push(20.0, 100);
        assert_eq!(pnl.total_quantity(), 200);
        assert!((pnl.avg_entry_price() - 15.0).abs() < EPS);
        // Marked at the last fill
        assert!((pnl.unrealized_pnl() - 1000.0).abs() < EPS);
    }

    #[test]
    fn test_decrease_realizes_against_average() {
        let mut pnl = PositionPnl::with_inventory(10, 5.0);
        assert_eq!(pnl.push(8.0, -4), Transition::Decrease);
        assert!((pnl.realized_pnl() - 12.0).abs() < EPS);
        assert_eq!(pnl.total_quantity(), 6);
        assert!((pnl.avg_entry_price() - 5.0).abs() < EPS);
        assert!((pnl.unrealized_pnl() - 18.0).abs() < EPS);
    }

    #[test]
    fn test_flatten_resets_state() {
        let mut pnl = PositionPnl::with_inventory(-10, 50.0);
        assert_eq!(pnl.push(45.0, 10), Transition::Flatten);
        assert!((pnl.realized_pnl() - 50.0).abs() < EPS);
        assert_eq!(pnl.total_quantity(), 0);
        assert_eq!(pnl.avg_entry_price(), 0.0);
        assert_eq!(pnl.unrealized_pnl(), 0.0);
    }

    #[test]
    fn test_observe_marks_without_trading() {
        let mut pnl = PositionPnl::with_inventory(100, 0.0);
        pnl.observe(100.0);
        assert_eq!(pnl.total_quantity(), 100);
        assert!((pnl.unrealized_pnl() - 10_000.0).abs() < EPS);
        assert!((pnl.total_pnl() - 10_000.0).abs() < EPS);

        let mut flat = PositionPnl::new();
        flat.observe(42.0);
        assert_eq!(flat.total_pnl(), 0.0);
        assert_eq!(flat.mark(), 42.0);
    }

    #[test]
    fn test_flatten_then_increase_equals_flip() {
        let mut stepwise = PositionPnl::with_inventory(10, 100.0);
        stepwise.push(110.0, -10);
        stepwise.push(110.0, -5);

        let mut flipped = PositionPnl::with_inventory(10, 100.0);
        assert_eq!(flipped.push(110.0, -15), Transition::Flip);

        assert_eq!(stepwise.total_quantity(), flipped.total_quantity());
        assert!((stepwise.avg_entry_price() - flipped.avg_entry_price()).abs() < EPS);
        assert!((stepwise.realized_pnl() - flipped.realized_pnl()).abs() < EPS);
        assert!((stepwise.unrealized_pnl() - flipped.unrealized_pnl()).abs() < EPS);
        assert!((flipped.realized_pnl() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_incremental_matches_replay() {
        let fills = [
            (0.0, 100),
            (101.0, -30),
            (99.0, 20),
            (104.0, -150),
            (97.0, 10),
            (95.0, 60),
            (102.0, 0),
            (103.0, 45),
            (100.0, -45),
        ];
        let mut pnl = PositionPnl::new();
        for &(price, delta) in &fills {
            pnl.push(price, delta);
        }
        let (realized, unrealized) = replay(&fills, pnl.mark());

        assert!((pnl.realized_pnl() - realized).abs() < 1e-6);
        assert!((pnl.unrealized_pnl() - unrealized).abs() < 1e-6);
    }

    #[test]
    fn test_incremental_matches_replay_on_random_fills() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = Vec::new();

        for _ in 0..40 {
            let mut pnl = PositionPnl::new();
            let mut fills = Vec::new();

            for _ in 0..150 {
                let price = rng.gen_range(5_000..15_000) as f64 / 100.0;
                let held = pnl.total_quantity();
                let delta = match rng.gen_range(0..10) {
                    0 => 0,
                    1 => -held,
                    // Through zero and out the other side
                    2 => -2 * held + rng.gen_range(-5..=5),
                    _ => rng.gen_range(-60..=60),
                };

                let transition = pnl.push(price, delta);
                if !seen.contains(&transition) {
                    seen.push(transition);
                }
                fills.push((price, delta));

                let (realized, unrealized) = replay(&fills, pnl.mark());
                let tolerance = |x: f64| 1e-6 * (1.0 + x.abs());
                assert!(
                    (pnl.realized_pnl() - realized).abs() < tolerance(realized),
                    "realized {} vs {realized} after {fills:?}",
                    pnl.realized_pnl()
                );
                assert!(
                    (pnl.unrealized_pnl() - unrealized).abs() < tolerance(unrealized),
                    "unrealized {} vs {unrealized} after {fills:?}",
                    pnl.unrealized_pnl()
                );
            }
        }

        assert_eq!(seen.len(), 4, "every transition exercised: {seen:?}");
    }
}
