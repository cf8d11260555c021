//! Single-agent search over the grid.
//!
//! Two algorithms live here:
//!
//! - [`DistanceField`] — a backward Dijkstra sweep from one goal vertex,
//!   recording the *step count* of the cheapest path from every vertex.
//!   Solvers build one field per agent up front and then answer
//!   distance-to-goal queries in O(1) every timestep.
//! - [`astar_path`] — oriented A\* over full `AgentState`s (rotations cost
//!   one step), used wherever an actual single-agent path is needed rather
//!   than just its length.
//!
//! Both order their heaps by cost with a deterministic secondary key, so
//! identical inputs explore identically (the optional RNG in `astar_path`
//! only shuffles equal-cost successor order).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;

use mapf_core::{AgentState, PlannerRng, VertexId};

use crate::grid::Grid;

// ── DistanceField ─────────────────────────────────────────────────────────────

/// Steps-to-goal for every vertex of a grid, for one fixed goal.
///
/// Distances follow the cheapest path under the grid's weight layer but are
/// reported in *steps*, which is the unit the per-timestep solvers rank
/// candidate cells by.  Unreachable vertices report [`DistanceField::UNREACHABLE`].
pub struct DistanceField {
    goal:  VertexId,
    steps: Vec<u32>,
}

impl DistanceField {
    /// Distance reported for vertices with no path to the goal.
    pub const UNREACHABLE: u32 = u32::MAX;

    /// Run a backward Dijkstra sweep from `goal` over reverse edges.
    ///
    /// Time complexity: O(V log V) with V = grid size; the field is built
    /// once per (agent, goal) and queried every timestep thereafter.
    pub fn build(grid: &Grid, goal: VertexId) -> DistanceField {
        let size = grid.size();
        let mut cost  = vec![f32::INFINITY; size];
        let mut steps = vec![Self::UNREACHABLE; size];

        // Min-heap on (cost, steps, vertex); the vertex key makes ties
        // deterministic.
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f32>, u32, VertexId)>> = BinaryHeap::new();
        cost[goal.index()] = 0.0;
        steps[goal.index()] = 0;
        heap.push(Reverse((OrderedFloat(0.0), 0, goal)));

        while let Some(Reverse((OrderedFloat(c), s, n))) = heap.pop() {
            if c > cost[n.index()] {
                continue; // stale heap entry
            }
            // Relax every predecessor m with a traversable edge m → n.
            let (nx, ny) = grid.pos(n);
            for dir in mapf_core::Orientation::ALL {
                let (dx, dy) = dir.delta();
                let Some(m) = grid.vertex_at(nx as i32 - dx, ny as i32 - dy) else {
                    continue;
                };
                let w = grid.weight(m, dir);
                if w >= crate::grid::IMPASSABLE {
                    continue;
                }
                let cm = c + w;
                if cm < cost[m.index()] {
                    cost[m.index()] = cm;
                    steps[m.index()] = s + 1;
                    heap.push(Reverse((OrderedFloat(cm), s + 1, m)));
                }
            }
        }

        DistanceField { goal, steps }
    }

    /// The goal this field was built for.
    #[inline]
    pub fn goal(&self) -> VertexId {
        self.goal
    }

    /// Steps from `v` to the goal along the cheapest path, or
    /// [`UNREACHABLE`](Self::UNREACHABLE).
    #[inline]
    pub fn steps(&self, v: VertexId) -> u32 {
        self.steps[v.index()]
    }

    /// `true` when a path from `v` to the goal exists.
    #[inline]
    pub fn reachable(&self, v: VertexId) -> bool {
        self.steps[v.index()] != Self::UNREACHABLE
    }
}

// ── Oriented A* ───────────────────────────────────────────────────────────────

struct SearchNode {
    state:  AgentState,
    g:      f32,
    parent: usize,
}

const NO_PARENT: usize = usize::MAX;

/// Cheapest single-agent path from `start` to `goal`, rotations included.
///
/// Returns the inclusive state sequence `start ..= goal` and its cost, or
/// `None` when the goal is unreachable.  A `goal` with `heading: None`
/// matches any arrival heading.  Vertices in `prohibited` are never entered
/// (the start vertex is exempt).  When `rng` is supplied, equal-cost
/// successors are explored in random order — useful for decorrelating the
/// paths of agents that share corridors.
pub fn astar_path(
    grid:       &Grid,
    start:      AgentState,
    goal:       AgentState,
    mut rng:    Option<&mut PlannerRng>,
    prohibited: &[VertexId],
) -> Option<(Vec<AgentState>, f32)> {
    if reaches_goal(start, goal) {
        return Some((vec![start], 0.0));
    }

    let forbidden: FxHashSet<VertexId> = prohibited.iter().copied().collect();

    // Node pool + index-based heap, so the heap stores plain `usize`s and
    // reconstruction is a parent-chain walk.
    let mut pool: Vec<SearchNode> = Vec::with_capacity(grid.size());
    let mut closed: FxHashSet<AgentState> = FxHashSet::default();

    // Min-heap on (f, Reverse(g), insertion index): f ascending, deeper
    // nodes first among equals, then insertion order for determinism.
    let mut open: BinaryHeap<Reverse<(OrderedFloat<f32>, Reverse<OrderedFloat<f32>>, usize)>> =
        BinaryHeap::new();

    let h0 = grid.manhattan(start.vertex, goal.vertex) as f32;
    pool.push(SearchNode { state: start, g: 0.0, parent: NO_PARENT });
    open.push(Reverse((OrderedFloat(h0), Reverse(OrderedFloat(0.0)), 0)));

    while let Some(Reverse((_, _, idx))) = open.pop() {
        let (curr_state, curr_g) = {
            let n = &pool[idx];
            (n.state, n.g)
        };
        if !closed.insert(curr_state) {
            continue;
        }

        if reaches_goal(curr_state, goal) {
            return Some((reconstruct(&pool, idx), curr_g));
        }

        let mut succ = grid.successors(curr_state);
        if let Some(r) = rng.as_deref_mut() {
            r.shuffle(&mut succ);
        }
        for next in succ {
            if closed.contains(&next) {
                continue;
            }
            if next.vertex != curr_state.vertex && forbidden.contains(&next.vertex) {
                continue;
            }
            // A move pays the edge weight; a rotation in place pays 1.
            let w = if next.vertex == curr_state.vertex {
                1.0
            } else {
                match grid.edge_weight(curr_state.vertex, next.vertex) {
                    Some(w) if w < crate::grid::IMPASSABLE => w,
                    _ => continue,
                }
            };
            let g = curr_g + w;
            let f = g + grid.manhattan(next.vertex, goal.vertex) as f32;
            pool.push(SearchNode { state: next, g, parent: idx });
            open.push(Reverse((
                OrderedFloat(f),
                Reverse(OrderedFloat(g)),
                pool.len() - 1,
            )));
        }
    }

    None
}

#[inline]
fn reaches_goal(state: AgentState, goal: AgentState) -> bool {
    state.vertex == goal.vertex
        && (goal.heading.is_none() || state.heading == goal.heading)
}

fn reconstruct(pool: &[SearchNode], last: usize) -> Vec<AgentState> {
    let mut path = Vec::new();
    let mut i = last;
    while i != NO_PARENT {
        path.push(pool[i].state);
        i = pool[i].parent;
    }
    path.reverse();
    path
}
