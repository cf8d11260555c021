//! The strategy trait every solver implements.

use mapf_plan::Plan;

use crate::error::SolverResult;

/// A solving strategy bound to one instance.
///
/// Lifecycle: construct (via the registry), call [`solve`](Solver::solve)
/// exactly once, then inspect [`succeeded`](Solver::succeeded) and
/// [`plan`](Solver::plan).  A solver is not re-entrant: one run owns its
/// working state exclusively, and `solve` blocks the caller until the
/// terminal condition or a configured budget is hit.
pub trait Solver {
    /// The strategy's registered name.
    fn name(&self) -> &'static str;

    /// Run to completion or budget exhaustion.
    ///
    /// Always returns within the configured timestep/computation budget,
    /// regardless of solvability.
    fn solve(&mut self);

    /// Whether the last `solve` reached every goal.
    ///
    /// Meaningful only after `solve` returns; `false` beforehand.
    fn succeeded(&self) -> bool;

    /// The produced plan.
    ///
    /// Fails with [`SolverError::NotSolved`](crate::SolverError::NotSolved)
    /// before the first `solve` call.  After a run it succeeds even when
    /// `succeeded()` is `false` — a partial plan from a non-converged run is
    /// a normal outcome, useful for inspection.
    fn plan(&self) -> SolverResult<&Plan>;

    /// Wall-clock duration of the last `solve` call, in milliseconds.
    fn elapsed_ms(&self) -> u64;
}

impl std::fmt::Debug for dyn Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver").field("name", &self.name()).finish()
    }
}
