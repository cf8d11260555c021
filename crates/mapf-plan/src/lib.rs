//! `mapf-plan` — the output side of the planner.
//!
//! A [`Plan`] is one joint configuration (one [`AgentState`] per agent) per
//! timestep, produced once by a solver run and immutable afterwards except
//! for read-only validation and serialization.
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`plan`]     | `Plan` — per-timestep configurations, makespan  |
//! | [`validate`] | conflict validation against an `Instance`       |
//! | [`io`]       | CSV save/load (lossless round-trip)             |
//! | [`error`]    | `PlanError`, `PlanResult<T>`                    |
//!
//! [`AgentState`]: mapf_core::AgentState

pub mod error;
pub mod io;
pub mod plan;
pub mod validate;


pub use error::{PlanError, PlanResult};
pub use plan::Plan;
