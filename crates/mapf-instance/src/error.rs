//! Instance-construction error type.

use mapf_core::AgentState;
use thiserror::Error;

/// Errors produced when constructing an [`Instance`](crate::Instance).
///
/// All of these are fatal to the constructor that raised them; no partially
/// built instance is ever observable.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("start list has {starts} states but goal list has {goals}")]
    MismatchedLength { starts: usize, goals: usize },

    #[error("agent {agent} {which} state {state} is not on the grid")]
    InvalidState {
        agent: usize,
        which: &'static str,
        state: AgentState,
    },

    #[error(
        "cannot sample {requested} agents on a grid with {free} free vertices"
    )]
    InfeasibleSampling { requested: usize, free: usize },
}

pub type InstanceResult<T> = Result<T, InstanceError>;
