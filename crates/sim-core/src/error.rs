//! Error types for sim-core operations.

use types::OrderError;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors that can occur during market operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimCoreError {
    /// The order failed validation and never reached the book.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        #[source]
        reason: OrderError,
    },
}

impl From<OrderError> for SimCoreError {
    fn from(reason: OrderError) -> Self {
        SimCoreError::InvalidOrder { reason }
    }
}
