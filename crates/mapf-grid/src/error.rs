//! Grid-subsystem error type.

use thiserror::Error;

/// Errors produced by `mapf-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    /// The map description is internally inconsistent (bad dimensions,
    /// ragged rows, missing `map` section, …).
    #[error("malformed map: {0}")]
    MalformedMap(String),

    /// The weight layer disagrees with the map it annotates.
    #[error("malformed weight layer: {0}")]
    MalformedWeights(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
