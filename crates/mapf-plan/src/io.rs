//! Plan-file persistence.
//!
//! # Format
//!
//! CSV with one row per (agent, timestep), written in stable agent-index
//! order, timesteps ascending within each agent:
//!
//! ```text
//! agent,timestep,x,y,heading
//! 0,0,9,17,3
//! 0,1,9,17,2
//! ...
//! ```
//!
//! `heading` is the weight-channel index of the agent's heading, or −1 for
//! an omnidirectional agent.  Because paths are padded (every agent has a
//! state at every timestep), the file encodes the makespan exactly as the
//! maximum timestep and round-trips losslessly: `load(save(plan))`
//! reproduces identical per-agent, per-timestep states.

use std::path::Path;

use serde::{Deserialize, Serialize};

use mapf_core::{AgentState, Orientation};
use mapf_grid::Grid;

use crate::error::{PlanError, PlanResult};
use crate::plan::Plan;

/// One serialized (agent, timestep) cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PlanRow {
    agent:    u32,
    timestep: u32,
    x:        u16,
    y:        u16,
    heading:  i8,
}

impl Plan {
    /// Serialize to a plan file at `path`.
    ///
    /// `grid` supplies the vertex → (x, y) mapping.  I/O failures are
    /// surfaced, never swallowed; saving does not require the plan to
    /// validate (a partial plan from a failed run is still worth keeping
    /// for inspection).
    pub fn save(&self, grid: &Grid, path: &Path) -> PlanResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for agent in 0..self.size() {
            for t in 0..=self.makespan() {
                // Indices are in range by construction of the loops.
                let Some(state) = self.get(t, agent) else {
                    continue;
                };
                let (x, y) = grid.pos(state.vertex);
                writer.serialize(PlanRow {
                    agent: agent as u32,
                    timestep: t,
                    x,
                    y,
                    heading: state.heading.map_or(-1, |h| h.index() as i8),
                })?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Parse a plan file written by [`save`](Plan::save).
    ///
    /// Rejects files with duplicate, missing, or out-of-grid cells — every
    /// agent must have exactly one state per timestep `0 ..= makespan`.
    pub fn load(grid: &Grid, path: &Path) -> PlanResult<Plan> {
        let mut reader = csv::Reader::from_path(path)?;

        let mut rows: Vec<(u32, u32, AgentState)> = Vec::new();
        let mut agents = 0u32;
        let mut steps = 0u32;
        for record in reader.deserialize() {
            let row: PlanRow = record?;
            let vertex = grid.vertex_at(row.x as i32, row.y as i32).ok_or_else(|| {
                PlanError::Parse(format!("cell ({}, {}) is not on the grid", row.x, row.y))
            })?;
            let heading = match row.heading {
                -1 => None,
                h if (0..4).contains(&h) => Some(
                    Orientation::from_index(h as u8)
                        .map_err(|e| PlanError::Parse(e.to_string()))?,
                ),
                h => return Err(PlanError::Parse(format!("bad heading {h}"))),
            };
            agents = agents.max(row.agent + 1);
            steps = steps.max(row.timestep + 1);
            rows.push((row.agent, row.timestep, AgentState { vertex, heading }));
        }
        if rows.is_empty() {
            return Err(PlanError::Parse("plan file holds no rows".into()));
        }

        let n = agents as usize;
        let mut configs: Vec<Vec<Option<AgentState>>> = vec![vec![None; n]; steps as usize];
        for (agent, t, state) in rows {
            let slot = &mut configs[t as usize][agent as usize];
            if slot.is_some() {
                return Err(PlanError::Parse(format!(
                    "duplicate row for agent {agent} at timestep {t}"
                )));
            }
            *slot = Some(state);
        }

        let mut plan = Plan::new();
        for (t, config) in configs.into_iter().enumerate() {
            let full: Vec<AgentState> = config
                .into_iter()
                .enumerate()
                .map(|(agent, s)| {
                    s.ok_or_else(|| {
                        PlanError::Parse(format!(
                            "agent {agent} has no state at timestep {t}"
                        ))
                    })
                })
                .collect::<PlanResult<_>>()?;
            plan.push(full)?;
        }
        Ok(plan)
    }
}
