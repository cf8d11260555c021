//! Instance lower bounds — cheap optimality yardsticks.
//!
//! PIBT is not an optimal solver, so the interesting question about its
//! output is "how far from ideal?".  These bounds ignore inter-agent
//! conflicts entirely: each agent's distance-to-goal is computed on the
//! empty grid, making them true lower bounds for any solver.

use mapf_grid::DistanceField;
use mapf_instance::Instance;

/// Conflict-free lower bounds for an instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LowerBounds {
    /// Sum-of-costs bound: total steps if no agent ever had to yield.
    pub sum_of_costs: u32,
    /// Makespan bound: the longest single-agent distance.
    pub makespan: u32,
}

/// Compute both bounds, or `None` when any agent's goal is unreachable from
/// its start (no finite plan exists at all).
///
/// Cost: one backward Dijkstra sweep per agent — the same work a solver run
/// performs up front.
pub fn lower_bounds(instance: &Instance) -> Option<LowerBounds> {
    let grid = instance.grid();
    let mut sum_of_costs = 0u32;
    let mut makespan = 0u32;
    for i in 0..instance.agent_count() {
        let field = DistanceField::build(grid, instance.goal(i).vertex);
        let d = field.steps(instance.start(i).vertex);
        if d == DistanceField::UNREACHABLE {
            return None;
        }
        sum_of_costs += d;
        makespan = makespan.max(d);
    }
    Some(LowerBounds { sum_of_costs, makespan })
}
