//! Identifier and time types for the market simulation.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// =============================================================================
// Constants
// =============================================================================

/// Price scale factor: 10,000 means 4 decimal places.
/// - `10000` = $1.00
/// - `1` = $0.0001 (smallest price increment)
pub const PRICE_SCALE: i64 = 10_000;

// =============================================================================
// Trader Identifier
// =============================================================================

/// Unique, human-readable identifier for a trader (e.g. `fundamentalist_3`).
///
/// Identifiers are assigned by the simulation at construction time and are
/// the key used by the order book to attribute resting orders and matches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(String);

impl TraderId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the identifier for the `index`-th trader (1-based) of an archetype.
    pub fn numbered(prefix: &str, index: usize) -> Self {
        Self(format!("{prefix}_{index}"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TraderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TraderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for TraderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Time Types
// =============================================================================

/// Simulation tick (discrete time step).
pub type Tick = u64;
