//! The `Instance` type and its two constructors.

use std::sync::Arc;

use tracing::debug;

use mapf_core::{AgentState, Orientation, PlannerRng, VertexId};
use mapf_grid::Grid;

use crate::error::{InstanceError, InstanceResult};

/// Rounds of goal resampling before random construction gives up.
///
/// Each round reshuffles the free-vertex pool; a round only fails when the
/// pool runs dry because too many candidates coincided with their agent's
/// start, so on any grid with headroom one round almost always suffices.
const MAX_SAMPLING_ROUNDS: usize = 100;

/// A multi-agent planning problem: one start and one goal state per agent.
///
/// Agent indices (positions in the start/goal lists) are assigned at
/// construction, never change, and are the identity used throughout the
/// resulting plan.  The instance shares the grid read-only and never
/// mutates it.
#[derive(Debug)]
pub struct Instance {
    grid:   Arc<Grid>,
    starts: Vec<AgentState>,
    goals:  Vec<AgentState>,
}

impl Instance {
    // ── Constructors ──────────────────────────────────────────────────────

    /// Build an instance from explicit start and goal lists.
    ///
    /// The lists must have equal length and every state must name a
    /// traversable vertex of `grid`.
    pub fn from_states(
        grid:   Arc<Grid>,
        starts: Vec<AgentState>,
        goals:  Vec<AgentState>,
    ) -> InstanceResult<Instance> {
        if starts.len() != goals.len() {
            return Err(InstanceError::MismatchedLength {
                starts: starts.len(),
                goals:  goals.len(),
            });
        }
        for (i, &s) in starts.iter().enumerate() {
            if !grid.is_vertex(s.vertex) {
                return Err(InstanceError::InvalidState { agent: i, which: "start", state: s });
            }
        }
        for (i, &g) in goals.iter().enumerate() {
            if !grid.is_vertex(g.vertex) {
                return Err(InstanceError::InvalidState { agent: i, which: "goal", state: g });
            }
        }
        Ok(Instance { grid, starts, goals })
    }

    /// Build an instance with `agent_count` randomly sampled agents.
    ///
    /// Start vertices are distinct, goal vertices are distinct, and no
    /// agent's goal equals its own start; headings are sampled uniformly.
    /// Fails with [`InstanceError::InfeasibleSampling`] when the grid has
    /// fewer free vertices than agents, or when goal sampling cannot be
    /// completed within a bounded number of rounds.
    pub fn random(
        grid:        Arc<Grid>,
        agent_count: usize,
        rng:         &mut PlannerRng,
    ) -> InstanceResult<Instance> {
        let free: Vec<VertexId> = (0..grid.size() as u32)
            .map(VertexId)
            .filter(|&v| grid.is_vertex(v))
            .collect();
        if free.len() < agent_count || agent_count == 0 {
            return Err(InstanceError::InfeasibleSampling {
                requested: agent_count,
                free:      free.len(),
            });
        }

        let mut pool = free.clone();
        rng.shuffle(&mut pool);
        let starts: Vec<AgentState> = pool[..agent_count]
            .iter()
            .map(|&v| AgentState::oriented(v, random_heading(rng)))
            .collect();

        for round in 0..MAX_SAMPLING_ROUNDS {
            let mut pool = free.clone();
            rng.shuffle(&mut pool);

            let mut goals: Vec<AgentState> = Vec::with_capacity(agent_count);
            for &v in &pool {
                if goals.len() == agent_count {
                    break;
                }
                if v == starts[goals.len()].vertex {
                    continue; // an agent may not be tasked with staying put
                }
                goals.push(AgentState::oriented(v, random_heading(rng)));
            }

            if goals.len() == agent_count {
                debug!(agents = agent_count, round, "sampled random instance");
                return Ok(Instance { grid, starts, goals });
            }
        }

        Err(InstanceError::InfeasibleSampling {
            requested: agent_count,
            free:      free.len(),
        })
    }

    // ── Accessors (pure queries) ──────────────────────────────────────────

    /// The shared grid this problem lives on.
    #[inline]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Number of agents.  Fixed at construction.
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.starts.len()
    }

    /// All start states, in agent-index order.
    #[inline]
    pub fn starts(&self) -> &[AgentState] {
        &self.starts
    }

    /// All goal states, in agent-index order.
    #[inline]
    pub fn goals(&self) -> &[AgentState] {
        &self.goals
    }

    /// Start state of agent `i`.
    #[inline]
    pub fn start(&self, i: usize) -> AgentState {
        self.starts[i]
    }

    /// Goal state of agent `i`.
    #[inline]
    pub fn goal(&self, i: usize) -> AgentState {
        self.goals[i]
    }
}

fn random_heading(rng: &mut PlannerRng) -> Orientation {
    Orientation::ALL[rng.gen_range(0..4usize)]
}
