//! `mapf-solver` — pluggable solving strategies over one shared grid.
//!
//! # Architecture
//!
//! A [`Solver`] is a strategy object constructed from an
//! [`Instance`](mapf_instance::Instance) plus a
//! [`PlannerConfig`](mapf_core::PlannerConfig), selected by name through the
//! [`SolverRegistry`] — never by runtime type inspection.  `solve()` runs the
//! strategy to completion or budget exhaustion; non-convergence is a normal
//! outcome reported through `succeeded()`, not an error.
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`solver`]   | `Solver` trait                                  |
//! | [`registry`] | `SolverRegistry`, `make_solver`                 |
//! | [`pibt`]     | `PibtSolver` — priority inheritance with backtracking |
//! | [`bounds`]   | conflict-free `LowerBounds` for an instance     |
//! | [`error`]    | `SolverError`, `SolverResult<T>`                |
//!
//! # Concurrency model
//!
//! One solver run owns its working state exclusively and blocks the caller;
//! the shared grid is read-only, so any number of *independent* runs may
//! proceed concurrently, each with its own occupancy tables.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Builds per-agent distance fields on Rayon's pool.    |

pub mod bounds;
pub mod error;
pub mod pibt;
pub mod registry;
pub mod solver;

#[cfg(test)]
mod tests;

pub use bounds::{lower_bounds, LowerBounds};
pub use error::{SolverError, SolverResult};
pub use pibt::PibtSolver;
pub use registry::{make_solver, SolverFactory, SolverRegistry};
pub use solver::Solver;
