//! Error types for trader decisions.

use types::OrderError;

/// Reasons the portfolio refuses to size an order.
///
/// These are routine: most ticks some traders cannot afford their target.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskViolation {
    #[error("target fraction must be nonzero")]
    ZeroTarget,
    #[error("target fraction {0} outside (-1, 1)")]
    TargetOutOfRange(f64),
    #[error("no positive mark price to size against")]
    NoMarkPrice,
    #[error("insufficient cash: need {required:.2}, available {available:.2}")]
    InsufficientCash { required: f64, available: f64 },
    #[error("insufficient stock: need {required}, available {available}")]
    InsufficientStock { required: i64, available: i64 },
    #[error("sized order rounds to zero shares")]
    BelowMinimumSize,
    #[error("sized order of {size} shares exceeds the {max} share limit")]
    AboveMaximumSize { size: f64, max: i64 },
}

/// Why a trader produced no order this step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraderError {
    #[error("risk check failed: {0}")]
    Risk(#[from] RiskViolation),
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),
}

/// Result type for trader decisions.
pub type Result<T> = std::result::Result<T, TraderError>;
