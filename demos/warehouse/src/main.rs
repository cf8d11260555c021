//! warehouse — end-to-end demonstration of the rust_mapf planner.
//!
//! Loads the bundled warehouse floor, builds a three-agent instance whose
//! pickers all converge on the same station, solves it with PIBT, validates
//! the result, and writes `warehouse.plan` (CSV) to the working directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use mapf_core::{AgentState, Orientation, PlannerConfig};
use mapf_grid::Grid;
use mapf_instance::Instance;
use mapf_solver::{lower_bounds, make_solver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64  = 42;
const VERBOSE:    bool = true;
const PLAN_FILE: &str  = "warehouse.plan";

/// Start states (x, y, heading-channel) for the three pickers.
const STARTS: [(i32, i32, u8); 3] = [(9, 17, 3), (25, 17, 1), (17, 9, 0)];
/// All pickers deliver to the same station, docking north-facing.
const GOAL: (i32, i32, u8) = (17, 18, 0);

fn main() -> Result<()> {
    // 1. Configuration (the option surface the library honors).
    let config = PlannerConfig {
        map_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/warehouse")),
        strategy: String::from("PIBT"),
        verbose:  VERBOSE,
        seed:     SEED,
        ..PlannerConfig::default()
    };

    // `verbose` only widens the diagnostic narration; results are identical.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(if config.verbose { "debug" } else { "warn" }))
        .with_target(false)
        .init();

    println!("==== Parameters ====");
    println!("{:<18} {}", "map", config.map_path.display());
    println!("{:<18} {}", "solver", config.strategy);
    println!("{:<18} {}", "verbose", config.verbose);
    println!("{:<18} {}", "with_weights", config.with_weights);
    println!("{:<18} {}", "seed", config.seed);
    println!("{:<18} {}", "max_timestep", config.max_timestep);
    println!("--------------------");

    let t_start = Instant::now();

    // 2. Build the shared grid.
    let grid = Arc::new(Grid::load(&config.map_path, config.with_weights)?);
    println!(
        "Grid: {}x{}, {} free vertices, weight layer of {} entries",
        grid.width(),
        grid.height(),
        grid.vertex_count(),
        grid.weights().len()
    );

    // 3. Build the instance.
    let state = |(x, y, h): (i32, i32, u8)| -> Result<AgentState> {
        let vertex = grid
            .vertex_at(x, y)
            .ok_or_else(|| anyhow::anyhow!("cell ({x}, {y}) is not on the grid"))?;
        Ok(AgentState::oriented(vertex, Orientation::from_index(h)?))
    };
    let starts = STARTS.iter().copied().map(state).collect::<Result<Vec<_>>>()?;
    let goals = vec![state(GOAL)?; STARTS.len()];
    let instance = Arc::new(Instance::from_states(grid.clone(), starts, goals)?);
    println!("Agents: {}", instance.agent_count());
    if let Some(bounds) = lower_bounds(&instance) {
        println!(
            "Lower bounds: sum-of-costs {}, makespan {}",
            bounds.sum_of_costs, bounds.makespan
        );
    }

    // 4. Resolve and run the solver.
    let mut solver = make_solver(instance.clone(), &config)?;
    println!("Solver: {}", solver.name());
    solver.solve();
    println!("Succeeded: {}", solver.succeeded());

    // 5. Inspect, validate, persist.
    let plan = solver.plan()?;
    println!("Paths: {}", plan.size());
    println!("Makespan: {}", plan.makespan());
    println!("Conflict-free: {}", plan.validate(&instance));
    plan.save(&grid, Path::new(PLAN_FILE))?;
    println!("Saved: {PLAN_FILE}");

    // 6. Summary.
    println!();
    println!("{:<8} {:<10} {:<14}", "Agent", "Steps", "Final cell");
    println!("{}", "-".repeat(32));
    for i in 0..plan.size() {
        let path = plan.path(i);
        let last = path.last().copied();
        let cell = last.map_or_else(String::new, |s| {
            let (x, y) = grid.pos(s.vertex);
            format!("({x}, {y})")
        });
        println!("{:<8} {:<10} {:<14}", i, path.len(), cell);
    }
    println!();
    println!(
        "Elapsed: {:.3} ms (solver {} ms)",
        t_start.elapsed().as_secs_f64() * 1e3,
        solver.elapsed_ms()
    );

    Ok(())
}
