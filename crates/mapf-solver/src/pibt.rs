//! Priority Inheritance with Backtracking — the primary solving strategy.
//!
//! # Per-timestep protocol
//!
//! 1. Sort the not-yet-arrived agents by priority: longest time without
//!    progress toward the goal first, then largest initial distance, then
//!    agent index.  The order is recomputed every timestep.
//! 2. In that order, each unassigned agent runs the PIBT decision
//!    ([`Working::decide`]): rank candidate cells (neighbors + stay) by
//!    distance-to-goal and reserve the best one, recursively displacing an
//!    unassigned occupant first ("priority inheritance").  A reservation
//!    table over next-timestep cells plus a swap guard against the displacing
//!    parent make vertex and swap conflicts structurally impossible.
//! 3. Reservations become actions: a vehicle that does not face its reserved
//!    cell rotates toward it instead of moving; an agent at its goal cell
//!    rotates toward the goal heading.  Move chains resolve in occupancy
//!    order so a cycle of agents can rotate positions in one timestep.
//! 4. The resulting joint configuration is appended to the plan; agents
//!    whose state equals their goal dock and leave the grid.
//!
//! PIBT is incomplete: it can miss solutions that exist, in exchange for
//! O(agents × degree) work per timestep.  Non-convergence (timestep budget,
//! wall-clock budget, or a stall) ends the run with `succeeded() == false`
//! and the partial plan kept.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use mapf_core::{AgentState, Orientation, PlannerConfig, PlannerRng, VertexId};
use mapf_grid::{DistanceField, Grid};
use mapf_instance::Instance;
use mapf_plan::{Plan, PlanResult};

use crate::error::{SolverError, SolverResult};
use crate::solver::Solver;

// ── Agent bookkeeping ─────────────────────────────────────────────────────────

/// One timestep's resolved action for an active agent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Action {
    Wait,
    Move,
    TurnLeft,
    TurnRight,
}

struct AgentRecord {
    curr: AgentState,
    /// Cell reserved for the next timestep; `None` until the decision phase
    /// assigns one, and again after the apply phase consumes it.
    next: Option<VertexId>,
    goal: AgentState,
    /// Timesteps since the agent last reduced its distance-to-goal.
    /// Primary priority key — monotone while the agent is stuck.
    idle: u32,
    /// Distance-to-goal from the start vertex; secondary priority key.
    init_dist: u32,
    /// Distance-to-goal after the previous timestep, for progress tracking.
    prev_dist: u32,
    done: bool,
}

// ── PibtSolver ────────────────────────────────────────────────────────────────

/// The PIBT strategy bound to one instance.
pub struct PibtSolver {
    instance:         Arc<Instance>,
    rng:              PlannerRng,
    max_timestep:     u32,
    max_comp_time_ms: u64,
    stall_limit:      u32,
    plan:             Plan,
    solved:           bool,
    ran:              bool,
    elapsed_ms:       u64,
}

impl PibtSolver {
    /// The name this strategy registers under.
    pub const NAME: &'static str = "PIBT";

    pub fn new(instance: Arc<Instance>, config: &PlannerConfig) -> PibtSolver {
        PibtSolver {
            instance,
            rng:              PlannerRng::new(config.seed),
            max_timestep:     config.max_timestep,
            max_comp_time_ms: config.max_comp_time_ms,
            stall_limit:      config.stall_limit,
            plan:             Plan::new(),
            solved:           false,
            ran:              false,
            elapsed_ms:       0,
        }
    }

    fn run(&mut self, t_start: Instant) -> PlanResult<bool> {
        let instance = Arc::clone(&self.instance);
        let grid = instance.grid().as_ref();
        let n = instance.agent_count();

        // One distance field per agent, over the shared read-only grid.
        let fields = build_distance_fields(grid, instance.goals());
        debug!(
            agents = n,
            precomp_ms = t_start.elapsed().as_millis() as u64,
            "distance fields built"
        );

        let mut work = Working {
            grid,
            fields: &fields,
            agents: (0..n)
                .map(|i| {
                    let start = instance.start(i);
                    let d = fields[i].steps(start.vertex);
                    AgentRecord {
                        curr:      start,
                        next:      None,
                        goal:      instance.goal(i),
                        idle:      0,
                        init_dist: d,
                        prev_dist: d,
                        done:      false,
                    }
                })
                .collect(),
            occupied_now:  vec![None; grid.size()],
            occupied_next: vec![None; grid.size()],
        };
        for i in 0..n {
            work.occupied_now[work.agents[i].curr.vertex.index()] = Some(i);
        }

        self.plan = Plan::new();
        self.plan.push(instance.starts().to_vec())?;
        let mut last_config = instance.starts().to_vec();

        // Agents already at their goal dock before the first timestep, so a
        // fully-arrived instance yields makespan 0 with paths of length 1.
        let mut remaining = n;
        for i in 0..n {
            if work.agents[i].curr == work.agents[i].goal {
                work.occupied_now[work.agents[i].curr.vertex.index()] = None;
                work.agents[i].done = true;
                remaining -= 1;
            }
        }
        if remaining == 0 {
            info!("all agents start at their goals");
            return Ok(true);
        }

        let mut timestep = 0u32;
        let mut stalled = 0u32;
        loop {
            // ── Decision phase ────────────────────────────────────────────
            let mut order: Vec<usize> =
                (0..n).filter(|&i| !work.agents[i].done).collect();
            order.sort_by(|&a, &b| {
                let (ra, rb) = (&work.agents[a], &work.agents[b]);
                rb.idle
                    .cmp(&ra.idle)
                    .then(rb.init_dist.cmp(&ra.init_dist))
                    .then(a.cmp(&b))
            });
            for &i in &order {
                if work.agents[i].next.is_none() {
                    work.decide(&mut self.rng, i, None, 0);
                }
            }

            // ── Action derivation ─────────────────────────────────────────
            let actions: Vec<Option<Action>> = (0..n)
                .map(|i| {
                    let a = &work.agents[i];
                    if a.done {
                        None
                    } else {
                        a.next.map(|next| resolve_action(grid, a.curr, next, a.goal))
                    }
                })
                .collect();

            // ── Apply phase ───────────────────────────────────────────────
            let mut config: Vec<AgentState> = (0..n)
                .map(|i| {
                    let a = &work.agents[i];
                    if a.done { a.goal } else { a.curr }
                })
                .collect();
            for i in 0..n {
                if work.agents[i].done || work.agents[i].next.is_none() {
                    continue; // docked, or already applied through a move chain
                }
                match actions[i] {
                    Some(Action::Wait) => work.apply_wait(i, &mut config),
                    Some(act @ (Action::TurnLeft | Action::TurnRight)) => {
                        work.apply_turn(i, act, &mut config);
                    }
                    Some(Action::Move) => {
                        work.apply_move(i, &actions, &mut config);
                    }
                    None => {}
                }
            }
            self.plan.push(config.clone())?;

            // ── Progress tracking and arrivals ────────────────────────────
            for i in 0..n {
                if work.agents[i].done {
                    continue;
                }
                let d = work.fields[i].steps(work.agents[i].curr.vertex);
                let rec = &mut work.agents[i];
                if d < rec.prev_dist {
                    rec.idle = 0;
                } else {
                    rec.idle += 1;
                }
                rec.prev_dist = d;
                if rec.curr == rec.goal {
                    work.occupied_now[rec.curr.vertex.index()] = None;
                    work.agents[i].done = true;
                    remaining -= 1;
                }
            }
            timestep += 1;
            if remaining == 0 {
                info!(timestep, "all agents arrived");
                return Ok(true);
            }

            // ── Failure detection ─────────────────────────────────────────
            if config == last_config {
                stalled += 1;
            } else {
                stalled = 0;
            }
            last_config = config;

            if self.stall_limit > 0 && stalled >= self.stall_limit {
                warn!(timestep, remaining, "no agent has moved for {stalled} timesteps");
                return Ok(false);
            }
            if timestep >= self.max_timestep {
                warn!(remaining, "exceeded the maximum number of timesteps");
                return Ok(false);
            }
            if t_start.elapsed().as_millis() as u64 >= self.max_comp_time_ms {
                warn!(timestep, remaining, "exceeded the computation time budget");
                return Ok(false);
            }
        }
    }
}

impl Solver for PibtSolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&mut self) {
        info!(agents = self.instance.agent_count(), "running PIBT");
        let t_start = Instant::now();
        self.ran = true;
        self.solved = match self.run(t_start) {
            Ok(solved) => solved,
            Err(e) => {
                // Unreachable with well-formed working state; treated as a
                // failed run rather than a panic.
                warn!("solver aborted: {e}");
                false
            }
        };
        self.elapsed_ms = t_start.elapsed().as_millis() as u64;
    }

    fn succeeded(&self) -> bool {
        self.ran && self.solved
    }

    fn plan(&self) -> SolverResult<&Plan> {
        if !self.ran {
            return Err(SolverError::NotSolved);
        }
        Ok(&self.plan)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

// ── Working state ─────────────────────────────────────────────────────────────

/// Per-run mutable state: agent records plus the two occupancy tables.
///
/// `occupied_now` maps each cell to the agent currently standing on it;
/// `occupied_next` holds next-timestep reservations.  Docked agents appear
/// in neither.
struct Working<'a> {
    grid:          &'a Grid,
    fields:        &'a [DistanceField],
    agents:        Vec<AgentRecord>,
    occupied_now:  Vec<Option<usize>>,
    occupied_next: Vec<Option<usize>>,
}

impl Working<'_> {
    #[inline]
    fn dist(&self, agent: usize, v: VertexId) -> u32 {
        self.fields[agent].steps(v)
    }

    /// The PIBT decision for `agent`: reserve the best available cell for
    /// the next timestep, recursively displacing an unassigned occupant.
    ///
    /// Returns `false` when every candidate was unavailable and the agent
    /// fell back to reserving its own cell (the caller then tries its next
    /// candidate).  Recursion depth is bounded by the agent count: every
    /// frame on the stack belongs to an agent that already holds a tentative
    /// reservation, and reserved agents are never re-entered.
    fn decide(
        &mut self,
        rng:    &mut PlannerRng,
        agent:  usize,
        parent: Option<usize>,
        depth:  usize,
    ) -> bool {
        debug_assert!(
            depth < self.agents.len(),
            "priority inheritance recursed deeper than the agent count"
        );
        let curr = self.agents[agent].curr;

        let mut cands: Vec<VertexId> = self
            .grid
            .neighbors(curr.vertex)
            .map(|(_, target, _)| target)
            .collect();
        cands.push(curr.vertex);
        // Shuffle, then stable-sort: equal-rank candidates end up in random
        // order while the ranking itself stays deterministic.
        rng.shuffle(&mut cands);
        let forward = curr.heading.and_then(|h| {
            let (x, y) = self.grid.pos(curr.vertex);
            let (dx, dy) = h.delta();
            self.grid.vertex_at(x as i32 + dx, y as i32 + dy)
        });
        cands.sort_by(|&u, &v| {
            // Nearer the goal first; prefer the faced cell (no rotation
            // needed); prefer cells nobody is standing on.
            self.dist(agent, u)
                .cmp(&self.dist(agent, v))
                .then_with(|| (Some(v) == forward).cmp(&(Some(u) == forward)))
                .then_with(|| {
                    self.occupied_now[u.index()]
                        .is_some()
                        .cmp(&self.occupied_now[v.index()].is_some())
                })
        });

        for v in cands {
            if self.occupied_next[v.index()].is_some() {
                continue; // reserved by a higher-priority agent
            }
            if parent.is_some_and(|p| v == self.agents[p].curr.vertex) {
                continue; // swap guard against the displacing parent
            }
            self.occupied_next[v.index()] = Some(agent);
            self.agents[agent].next = Some(v);
            if let Some(k) = self.occupied_now[v.index()] {
                if self.agents[k].next.is_none() {
                    // Priority inheritance: the occupant decides first.
                    if !self.decide(rng, k, Some(agent), depth + 1) {
                        // The occupant was stuck and reclaimed v.
                        continue;
                    }
                }
            }
            return true;
        }

        // Blocked on all sides: wait in place.  This may reclaim the cell
        // from the parent that was trying to displace us.
        self.agents[agent].next = Some(curr.vertex);
        self.occupied_next[curr.vertex.index()] = Some(agent);
        false
    }

    /// Release the reservation and stay put.
    fn apply_wait(&mut self, agent: usize, config: &mut [AgentState]) {
        if let Some(next) = self.agents[agent].next {
            debug_assert_eq!(self.occupied_next[next.index()], Some(agent));
            self.occupied_next[next.index()] = None;
        }
        self.agents[agent].next = None;
        config[agent] = self.agents[agent].curr;
    }

    /// Rotate 90° toward the reserved cell (which is released — the agent
    /// will re-reserve it next timestep, now facing the right way).
    fn apply_turn(&mut self, agent: usize, action: Action, config: &mut [AgentState]) {
        if let Some(next) = self.agents[agent].next {
            debug_assert_eq!(self.occupied_next[next.index()], Some(agent));
            self.occupied_next[next.index()] = None;
        }
        self.agents[agent].next = None;
        let rec = &mut self.agents[agent];
        if let Some(h) = rec.curr.heading {
            let turned = match action {
                Action::TurnLeft => h.left(),
                _ => h.right(),
            };
            rec.curr = rec.curr.facing(turned);
        }
        config[agent] = rec.curr;
    }

    /// Advance into the reserved cell, first resolving the chain of agents
    /// moving out of the way.  Degrades to a wait when the chain fails.
    ///
    /// Chain depth is bounded by the agent count: each link is the distinct
    /// occupant of a distinct cell, and cycles terminate because every agent
    /// vacates its cell before following the chain.
    fn apply_move(
        &mut self,
        agent:   usize,
        actions: &[Option<Action>],
        config:  &mut [AgentState],
    ) -> bool {
        let Some(next) = self.agents[agent].next else {
            return false;
        };
        debug_assert_eq!(self.occupied_next[next.index()], Some(agent));

        let curr_v = self.agents[agent].curr.vertex;
        match self.occupied_now[next.index()] {
            None => {
                debug_assert_eq!(self.occupied_now[curr_v.index()], Some(agent));
                self.occupied_now[curr_v.index()] = None;
                self.commit_move(agent, next, config);
                true
            }
            Some(occupant) => {
                if actions[occupant] != Some(Action::Move)
                    || self.agents[occupant].next.is_none()
                {
                    // The occupant is not leaving (or already resolved to
                    // stay): degrade to a wait.
                    self.apply_wait(agent, config);
                    return false;
                }
                // Vacate first so a rotation cycle can close through our cell.
                self.occupied_now[curr_v.index()] = None;
                if !self.apply_move(occupant, actions, config) {
                    self.occupied_now[curr_v.index()] = Some(agent);
                    self.apply_wait(agent, config);
                    return false;
                }
                debug_assert!(self.occupied_now[next.index()].is_none());
                self.commit_move(agent, next, config);
                true
            }
        }
    }

    fn commit_move(&mut self, agent: usize, next: VertexId, config: &mut [AgentState]) {
        self.occupied_now[next.index()] = Some(agent);
        self.occupied_next[next.index()] = None;
        let rec = &mut self.agents[agent];
        rec.curr = rec.curr.moved_to(next);
        rec.next = None;
        config[agent] = rec.curr;
    }
}

// ── Action derivation ─────────────────────────────────────────────────────────

/// Convert a cell reservation into this timestep's action.
///
/// A vehicle that does not face its reserved cell rotates toward it; one
/// sitting on its goal cell rotates toward the goal heading.  Omnidirectional
/// agents move directly.
fn resolve_action(grid: &Grid, curr: AgentState, next: VertexId, goal: AgentState) -> Action {
    if next == curr.vertex {
        if let (Some(h), Some(goal_h)) = (curr.heading, goal.heading) {
            if curr.vertex == goal.vertex && h != goal_h {
                return turn_toward(h, goal_h);
            }
        }
        return Action::Wait;
    }

    let Some(h) = curr.heading else {
        return Action::Move;
    };
    let (cx, cy) = grid.pos(curr.vertex);
    let (nx, ny) = grid.pos(next);
    let Some(target) = Orientation::from_delta(nx as i32 - cx as i32, ny as i32 - cy as i32)
    else {
        // Reservations are always adjacent; kept total for safety.
        return Action::Wait;
    };
    if h == target {
        Action::Move
    } else {
        turn_toward(h, target)
    }
}

#[inline]
fn turn_toward(from: Orientation, to: Orientation) -> Action {
    match from.steps_to(to) {
        1 | 2 => Action::TurnLeft,
        _ => Action::TurnRight,
    }
}

// ── Distance-field construction ───────────────────────────────────────────────

#[cfg(feature = "parallel")]
fn build_distance_fields(grid: &Grid, goals: &[AgentState]) -> Vec<DistanceField> {
    use rayon::prelude::*;
    // Sound without locking: every worker only reads the grid.
    goals
        .par_iter()
        .map(|g| DistanceField::build(grid, g.vertex))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_distance_fields(grid: &Grid, goals: &[AgentState]) -> Vec<DistanceField> {
    goals
        .iter()
        .map(|g| DistanceField::build(grid, g.vertex))
        .collect()
}
