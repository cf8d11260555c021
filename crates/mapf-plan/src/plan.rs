//! The `Plan` container.
//!
//! # Padding invariant
//!
//! Every configuration covers every agent: an agent that reaches its goal
//! before the plan's makespan holds its goal state for the remaining
//! timesteps.  Solvers maintain this by construction; [`push`](Plan::push)
//! only enforces the arity.  Padding is what makes the makespan recoverable
//! from a saved plan file without a separate header.

use mapf_core::AgentState;

use crate::error::{PlanError, PlanResult};

/// One joint configuration per timestep, indexed `[timestep][agent]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    configs: Vec<Vec<AgentState>>,
}

impl Plan {
    /// An empty plan (no configurations, no agents).
    pub fn new() -> Plan {
        Plan::default()
    }

    /// Build a plan from pre-assembled configurations.
    ///
    /// Fails when the configurations are not all the same length.
    pub fn from_configs(configs: Vec<Vec<AgentState>>) -> PlanResult<Plan> {
        let mut plan = Plan::new();
        for c in configs {
            plan.push(c)?;
        }
        Ok(plan)
    }

    /// Append the configuration for the next timestep.
    ///
    /// Fails when `config` does not have one state per agent.
    pub fn push(&mut self, config: Vec<AgentState>) -> PlanResult<()> {
        if let Some(first) = self.configs.first() {
            if first.len() != config.len() {
                return Err(PlanError::SizeMismatch {
                    expected: first.len(),
                    got:      config.len(),
                });
            }
        }
        self.configs.push(config);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` when no configuration has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Number of agents (paths) in the plan; 0 for an empty plan.
    #[inline]
    pub fn size(&self) -> usize {
        self.configs.first().map_or(0, Vec::len)
    }

    /// The length of the longest agent path in timesteps.
    ///
    /// A plan holding only the start configuration has makespan 0 (nothing
    /// has moved yet); an empty plan reports 0 as well.
    #[inline]
    pub fn makespan(&self) -> u32 {
        (self.configs.len().saturating_sub(1)) as u32
    }

    /// Agent `i`'s state at timestep `t`.
    #[inline]
    pub fn get(&self, t: u32, i: usize) -> Option<AgentState> {
        self.configs.get(t as usize)?.get(i).copied()
    }

    /// Agent `i`'s full path, one state per timestep `0 ..= makespan`.
    pub fn path(&self, i: usize) -> Vec<AgentState> {
        self.configs.iter().map(|c| c[i]).collect()
    }
}
