//! `mapf-core` — foundational types for the `rust_mapf` multi-agent planner.
//!
//! This crate is a dependency of every other `mapf-*` crate.  It intentionally
//! has no `mapf-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `VertexId`                                            |
//! | [`state`]     | `Orientation`, `AgentState`                           |
//! | [`rng`]       | `PlannerRng` — explicit, seedable randomness          |
//! | [`config`]    | `PlannerConfig` — the recognized option surface       |
//! | [`error`]     | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod state;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlannerConfig;
pub use error::{CoreError, CoreResult};
pub use ids::VertexId;
pub use rng::PlannerRng;
pub use state::{AgentState, Orientation};
