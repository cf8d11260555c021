//! Plan-subsystem error type.

use thiserror::Error;

/// Errors produced by `mapf-plan`.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A configuration with the wrong number of agents was appended.
    #[error("configuration has {got} agents but the plan holds {expected}")]
    SizeMismatch { expected: usize, got: usize },

    /// A plan file could not be interpreted (gaps, duplicates, unknown
    /// cells, bad heading values, …).
    #[error("malformed plan file: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
