//! Error types for building and querying a simulation.

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot sample {population} parameters: {reason}")]
    Distribution {
        population: &'static str,
        reason: String,
    },
    #[error("simulation already completed")]
    AlreadyCompleted,
    #[error("results are only available once the simulation has completed")]
    NotCompleted,
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
