//! Streaming oscillators: Relative Strength Index and MACD.

use crate::indicator::RollingIndicator;
use crate::rolling::RollingWindow;

/// RSI and MACD maintained together from one price stream.
///
/// RSI uses plain sums of gains and losses over the last `rsi_period`
/// price changes. MACD is the fast EMA minus the slow EMA; its signal line is
/// an EMA of MACD values.
#[derive(Debug, Clone)]
pub struct Oscillators {
    previous: Option<f64>,
    gains: RollingWindow,
    losses: RollingWindow,
    fast: RollingIndicator,
    slow: RollingIndicator,
    signal: RollingIndicator,
}

impl Default for Oscillators {
    /// RSI(14) and MACD(12, 26, 9).
    fn default() -> Self {
        Self::new(14, 12, 26, 9)
    }
}

impl Oscillators {
    pub fn new(rsi_period: usize, fast: usize, slow: usize, signal: usize) -> Self {
        let rsi_period = rsi_period.max(1);
        Self {
            previous: None,
            gains: RollingWindow::new(rsi_period),
            losses: RollingWindow::new(rsi_period),
            fast: RollingIndicator::new(fast),
            slow: RollingIndicator::new(slow),
            signal: RollingIndicator::new(signal),
        }
    }

    pub fn push(&mut self, price: f64) {
        if let Some(previous) = self.previous {
            let change = price - previous;
            self.gains.push(change.max(0.0));
            self.losses.push((-change).max(0.0));
        }
        self.previous = Some(price);

        self.fast.push(price);
        self.slow.push(price);
        if let Some(macd) = self.macd() {
            self.signal.push(macd);
        }
    }

    /// Relative Strength Index on a 0-100 scale, once `rsi_period` changes
    /// have been seen.
    pub fn rsi(&self) -> Option<f64> {
        if !self.gains.is_full() {
            return None;
        }
        let gain = self.gains.sum();
        let loss = self.losses.sum();
        if loss <= 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + gain / loss))
    }

    /// Fast EMA minus slow EMA.
    pub fn macd(&self) -> Option<f64> {
        Some(self.fast.ema()? - self.slow.ema()?)
    }

    pub fn macd_signal(&self) -> Option<f64> {
        self.signal.ema()
    }

    pub fn macd_histogram(&self) -> Option<f64> {
        Some(self.macd()? - self.macd_signal()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_all_gains() {
        let mut osc = Oscillators::new(3, 2, 3, 2);
        for p in [1.0, 2.0, 3.0] {
            osc.push(p);
        }
        assert_eq!(osc.rsi(), None);
        osc.push(4.0);
        assert_eq!(osc.rsi(), Some(100.0));
    }

    #[test]
    fn test_rsi_mixed() {
        let mut osc = Oscillators::new(4, 2, 3, 2);
        for p in [10.0, 12.0, 11.0, 14.0, 13.0] {
            osc.push(p);
        }
        // gains 2 + 3 = 5, losses 1 + 1 = 2, rs = 2.5
        let expected = 100.0 - 100.0 / 3.5;
        assert!((osc.rsi().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_macd_tracks_ema_difference() {
        let mut osc = Oscillators::new(3, 2, 3, 2);
        let mut fast = RollingIndicator::new(2);
        let mut slow = RollingIndicator::new(3);
        for p in [10.0, 11.0, 13.0, 12.0, 15.0] {
            osc.push(p);
            fast.push(p);
            slow.push(p);
        }
        let expected = fast.ema().unwrap() - slow.ema().unwrap();
        assert!((osc.macd().unwrap() - expected).abs() < 1e-12);
        assert!(osc.macd_signal().is_some());
        assert!(osc.macd_histogram().is_some());
    }

    #[test]
    fn test_macd_undefined_before_slow_window() {
        let mut osc = Oscillators::default();
        for p in 0..25 {
            osc.push(100.0 + p as f64);
        }
        assert_eq!(osc.macd(), None);
        osc.push(130.0);
        assert!(osc.macd().unwrap() > 0.0);
    }
}
