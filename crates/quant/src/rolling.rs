//! Rolling window data structure for streaming indicator calculations.
//!
//! Keeps running first and second moments so that mean and variance are
//! O(1) per update regardless of the window length.

use std::collections::VecDeque;

/// Longest window whose buffer is allocated up front.
const PREALLOCATE_LIMIT: usize = 4096;

/// A fixed-size rolling window of values.
///
/// Maintains the most recent `capacity` values, discarding the oldest when a
/// new one is pushed past capacity.
///
/// # Example
/// ```
/// use quant::rolling::RollingWindow;
///
/// let mut window = RollingWindow::new(3);
/// window.push(1.0);
/// window.push(2.0);
/// window.push(3.0);
/// assert_eq!(window.mean(), Some(2.0));
///
/// assert_eq!(window.push(4.0), Some(1.0));
/// assert_eq!(window.mean(), Some(3.0));
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow {
    data: VecDeque<f64>,
    capacity: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    /// Create a new rolling window with the given capacity.
    ///
    /// A zero-capacity window hands every pushed value straight back.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity.min(PREALLOCATE_LIMIT) + 1),
            capacity,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Push a value into the window.
    ///
    /// If the window was full, the oldest value is removed and returned.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.data.push_back(value);
        self.sum += value;
        self.sum_sq += value * value;

        if self.data.len() > self.capacity {
            let old = self.data.pop_front()?;
            self.sum -= old;
            self.sum_sq -= old * old;
            Some(old)
        } else {
            None
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the sum of all values in the window.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Get the mean of values in the window.
    ///
    /// Returns `None` if the window is empty.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum / self.data.len() as f64)
        }
    }

    /// Population variance of the values in the window.
    ///
    /// Returns `None` if the window has fewer than 2 values.
    pub fn variance(&self) -> Option<f64> {
        let n = self.data.len();
        if n < 2 {
            return None;
        }
        let n = n as f64;
        let mean = self.sum / n;
        // Cancellation can push an all-equal window slightly below zero.
        Some((self.sum_sq / n - mean * mean).max(0.0))
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Get the most recent value.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.data.back().copied()
    }

    /// Get the oldest value.
    #[inline]
    pub fn first(&self) -> Option<f64> {
        self.data.front().copied()
    }
}
