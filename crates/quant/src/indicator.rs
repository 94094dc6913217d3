//! Streaming rolling indicator.
//!
//! One [`RollingIndicator`] maintains SMA, EMA, variance and momentum over a
//! fixed window with O(1) amortized work per pushed value.

use crate::rolling::RollingWindow;

/// Streaming indicator over the last `window` values.
///
/// - SMA is defined once the window is full.
/// - EMA is seeded with the first full-window SMA, then updated with
///   `c * x + (1 - c) * ema` where `c = 2 / (window + 1)`.
/// - Variance is the population variance of the buffered values and is
///   defined from two observations on.
/// - Momentum compares the newest value with the last value evicted from the
///   window, or with the oldest buffered value before any eviction.
///
/// A zero window buffers nothing: each value is evicted as soon as it is
/// pushed, so momentum is always zero and SMA, EMA and variance stay
/// undefined.
#[derive(Debug, Clone)]
pub struct RollingIndicator {
    values: RollingWindow,
    coefficient: f64,
    newest: Option<f64>,
    last_evicted: Option<f64>,
    sma: Option<f64>,
    ema: Option<f64>,
}

impl RollingIndicator {
    /// Create an indicator over `window` values.
    pub fn new(window: usize) -> Self {
        Self {
            values: RollingWindow::new(window),
            coefficient: 2.0 / (window as f64 + 1.0),
            newest: None,
            last_evicted: None,
            sma: None,
            ema: None,
        }
    }

    pub fn window(&self) -> usize {
        self.values.capacity()
    }

    /// EMA smoothing coefficient `2 / (window + 1)`.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Number of values pushed so far, capped at the window length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.window() > 0 && self.values.is_full()
    }

    pub fn push(&mut self, value: f64) {
        self.newest = Some(value);
        if let Some(evicted) = self.values.push(value) {
            self.last_evicted = Some(evicted);
        }

        if self.is_ready() {
            let sma = self.values.sum() / self.values.capacity() as f64;
            self.sma = Some(sma);
            self.ema = Some(match self.ema {
                None => sma,
                Some(prev) => self.coefficient * value + (1.0 - self.coefficient) * prev,
            });
        }
    }

    pub fn sma(&self) -> Option<f64> {
        self.sma
    }

    pub fn ema(&self) -> Option<f64> {
        self.ema
    }

    pub fn variance(&self) -> Option<f64> {
        self.values.variance()
    }

    pub fn stddev(&self) -> Option<f64> {
        self.values.std_dev()
    }

    pub fn newest(&self) -> Option<f64> {
        self.newest
    }

    /// Value momentum is measured against.
    fn reference(&self) -> Option<f64> {
        self.last_evicted.or_else(|| self.values.first())
    }

    /// Newest value minus the reference value.
    pub fn momentum(&self) -> Option<f64> {
        Some(self.newest()? - self.reference()?)
    }

    /// Percentage change from the reference value. `None` when the
    /// reference is zero.
    pub fn rate_of_change(&self) -> Option<f64> {
        let reference = self.reference()?;
        if reference == 0.0 {
            return None;
        }
        Some((self.newest()? - reference) / reference * 100.0)
    }

    /// `(upper, lower)` bands at `sma ± width * stddev`.
    pub fn bollinger(&self, width: f64) -> Option<(f64, f64)> {
        let sma = self.sma?;
        let band = width * self.stddev()?;
        Some((sma + band, sma - band))
    }
}
