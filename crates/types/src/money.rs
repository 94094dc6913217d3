//! Fixed-point price and share quantity types.
//!
//! Book prices use fixed-point arithmetic with 4 decimal places so that price
//! levels compare and hash exactly. Accounting (cash, PnL) is done in `f64`
//! on top of [`Price::to_float`].

use crate::ids::PRICE_SCALE;
use derive_more::{Add, AddAssign, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Quantity Type (Newtype for shares)
// =============================================================================

/// Unsigned number of shares resting in the book.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Quantity(pub u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Magnitude of a signed order quantity.
    #[inline]
    pub fn from_signed(quantity: i64) -> Self {
        Quantity(quantity.unsigned_abs())
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Quantity(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Quantity(self.0.min(other.0))
    }

    /// Re-attach a sign: `-1` for negative, anything else for positive.
    #[inline]
    pub fn signed(self, sign: i64) -> i64 {
        let magnitude = self.0 as i64;
        if sign < 0 { -magnitude } else { magnitude }
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qty({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<u64> for Quantity {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Fixed-Point Price Type
// =============================================================================

/// Fixed-point price with 4 decimal places.
///
/// # Examples
/// - `Price(1_000_000)` = $100.00
/// - `Price(10000)` = $1.00
/// - `Price(1)` = $0.0001
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a Price from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Create a Price from a whole number of dollars.
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Self(units * PRICE_SCALE)
    }

    /// Like [`Price::from_units`], but `None` when the scaled value does not
    /// fit in an `i64`.
    #[inline]
    pub fn checked_from_units(units: i64) -> Option<Self> {
        units.checked_mul(PRICE_SCALE).map(Self)
    }

    /// Convert to floating-point for accounting and display.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Cash value of a signed quantity traded at this price.
    #[inline]
    pub fn notional(self, signed_quantity: i64) -> f64 {
        self.to_float() * signed_quantity as f64
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price(${:.4})", self.to_float())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.to_float())
    }
}
