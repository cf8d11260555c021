//! Core error type.
//!
//! Sub-crates define their own error enums (`GridError`, `InstanceError`, …)
//! and either convert `CoreError` via `From` or wrap it as one variant.

use thiserror::Error;

/// Errors raised by `mapf-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("orientation index {0} out of range (expected 0..4)")]
    InvalidOrientation(u8),
}

/// Shorthand result type for core primitives.
pub type CoreResult<T> = Result<T, CoreError>;
