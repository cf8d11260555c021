//! Conflict validation — the correctness oracle for solver output.
//!
//! `validate` re-walks every path and confirms the plan actually solves its
//! instance: endpoints match, every transition is physically possible, and
//! no two agents ever collide.  It returns `false` rather than erroring —
//! a failed check is information, not a fault — and emits a `tracing`
//! warning naming the first violation found.
//!
//! # Arrival convention
//!
//! An agent is *present* on the grid up to and including the first timestep
//! at which the remainder of its path is constantly its goal state; after
//! that it has docked and left the floor, and no longer participates in
//! conflicts.  This is what lets several agents share one goal vertex (a
//! pickup station) and still produce a valid plan: they arrive at different
//! timesteps, each vacating before the next one enters.

use tracing::warn;

use mapf_core::{AgentState, Orientation};
use mapf_grid::Grid;
use mapf_instance::Instance;

use crate::plan::Plan;

impl Plan {
    /// `true` when this plan is a conflict-free solution of `instance`.
    ///
    /// Pure query: calling it any number of times returns the same answer.
    pub fn validate(&self, instance: &Instance) -> bool {
        let grid = instance.grid();
        let n = instance.agent_count();

        if self.is_empty() {
            warn!("validation failed: plan is empty");
            return false;
        }
        if self.size() != n {
            warn!(
                plan = self.size(),
                instance = n,
                "validation failed: agent count mismatch"
            );
            return false;
        }

        // ── Endpoints ─────────────────────────────────────────────────────
        let makespan = self.makespan();
        for i in 0..n {
            if self.get(0, i) != Some(instance.start(i)) {
                warn!(agent = i, "validation failed: path does not begin at the start state");
                return false;
            }
            if self.get(makespan, i) != Some(instance.goal(i)) {
                warn!(agent = i, "validation failed: path does not end at the goal state");
                return false;
            }
        }

        // ── Arrival times ─────────────────────────────────────────────────
        //
        // arrival[i] = first timestep from which agent i's path is
        // constantly its goal state.  Well-defined here because the endpoint
        // check above guarantees the final state is the goal.
        let arrival: Vec<u32> = (0..n)
            .map(|i| {
                let goal = instance.goal(i);
                let mut t = makespan;
                while t > 0 && self.get(t - 1, i) == Some(goal) {
                    t -= 1;
                }
                t
            })
            .collect();
        let present = |i: usize, t: u32| t <= arrival[i];

        // ── Per-agent transitions ─────────────────────────────────────────
        for t in 1..=makespan {
            for i in 0..n {
                let (Some(prev), Some(curr)) = (self.get(t - 1, i), self.get(t, i)) else {
                    return false;
                };
                if !legal_transition(grid, prev, curr) {
                    warn!(agent = i, timestep = t, %prev, %curr,
                        "validation failed: illegal transition");
                    return false;
                }
            }
        }

        // ── Pairwise conflicts ────────────────────────────────────────────
        for t in 0..=makespan {
            for i in 0..n {
                if !present(i, t) {
                    continue;
                }
                for j in (i + 1)..n {
                    if !present(j, t) {
                        continue;
                    }
                    let (Some(a), Some(b)) = (self.get(t, i), self.get(t, j)) else {
                        return false;
                    };
                    if a.vertex == b.vertex {
                        warn!(timestep = t, agents = ?(i, j),
                            "validation failed: vertex conflict");
                        return false;
                    }
                    if t > 0 {
                        let (Some(pa), Some(pb)) = (self.get(t - 1, i), self.get(t - 1, j))
                        else {
                            return false;
                        };
                        if a.vertex == pb.vertex && pa.vertex == b.vertex {
                            warn!(timestep = t, agents = ?(i, j),
                                "validation failed: edge conflict");
                            return false;
                        }
                    }
                }
            }
        }

        true
    }
}

/// One-timestep legality: wait, a ±90° rotation in place, or a move into an
/// adjacent cell along the faced direction.
fn legal_transition(grid: &Grid, prev: AgentState, curr: AgentState) -> bool {
    if !grid.is_vertex(prev.vertex) || !grid.is_vertex(curr.vertex) {
        return false;
    }

    if prev.vertex == curr.vertex {
        return match (prev.heading, curr.heading) {
            (None, None) => true,
            // Waiting keeps the heading; a rotation changes it by ±90°.
            (Some(a), Some(b)) => matches!(a.steps_to(b), 0 | 1 | 3),
            _ => false,
        };
    }

    let (px, py) = grid.pos(prev.vertex);
    let (cx, cy) = grid.pos(curr.vertex);
    let Some(dir) = Orientation::from_delta(cx as i32 - px as i32, cy as i32 - py as i32)
    else {
        return false; // not adjacent
    };

    match (prev.heading, curr.heading) {
        // An omnidirectional agent may step to any neighbor.
        (None, None) => true,
        // A vehicle only advances into the cell it faces, heading unchanged.
        (Some(a), Some(b)) => a == b && dir == a,
        _ => false,
    }
}
