//! `mapf-instance` — the multi-agent planning problem.
//!
//! An [`Instance`] is an ordered, index-stable set of agents, each with a
//! start and a goal [`AgentState`](mapf_core::AgentState) on a shared
//! [`Grid`](mapf_grid::Grid).  It owns no path data — solving is the job of
//! `mapf-solver`, and the result lives in `mapf-plan`.
//!
//! | Module       | Contents                         |
//! |--------------|----------------------------------|
//! | [`instance`] | `Instance` + both constructors   |
//! | [`error`]    | `InstanceError`, `InstanceResult`|

pub mod error;
pub mod instance;

#[cfg(test)]
mod tests;

pub use error::{InstanceError, InstanceResult};
pub use instance::Instance;
