use super::config::ConfigError;
use crate::core::models::error::ArenaError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SimulationError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Arena(#[from] ArenaError),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A broken invariant detected during a tick. The simulation should be discarded.
    #[error("Internal logic error: {0}")]
    Internal(String),
}
