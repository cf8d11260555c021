//! Solver-framework error type.
//!
//! Both variants are programmer-usage errors — recoverable by the caller and
//! never retried internally.  Solve-time non-convergence is deliberately not
//! represented here; it is reported through `Solver::succeeded`.

use thiserror::Error;

/// Errors produced by the solver framework.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("no solving strategy registered under {0:?}")]
    UnknownStrategy(String),

    #[error("plan requested before solve() was run")]
    NotSolved,
}

pub type SolverResult<T> = Result<T, SolverError>;
