//! Unit tests for mapf-solver.
//!
//! The scenario tests double as the workspace's end-to-end coverage: they
//! run the full pipeline (grid → instance → registry → PIBT → plan →
//! validation) on hand-written maps.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use mapf_core::{AgentState, PlannerConfig};
    use mapf_grid::Grid;
    use mapf_instance::Instance;

    pub fn open_grid(width: usize, height: usize) -> Arc<Grid> {
        let mut text = format!("height {height}\nwidth {width}\nmap\n");
        for _ in 0..height {
            text.push_str(&".".repeat(width));
            text.push('\n');
        }
        Arc::new(Grid::parse(&text).unwrap())
    }

    /// A 34×20 warehouse floor: two banks of shelf racks in the lower rows,
    /// open staging area above.
    pub fn warehouse() -> Arc<Grid> {
        let shelves = "..@@@@..@@@@..@@@@..@@@@..@@@@....";
        let mut text = String::from("height 20\nwidth 34\nmap\n");
        for y in 0..20 {
            match y {
                1..=4 | 6..=7 => text.push_str(shelves),
                _ => text.push_str(&".".repeat(34)),
            }
            text.push('\n');
        }
        Arc::new(Grid::parse(&text).unwrap())
    }

    pub fn headless(grid: &Grid, x: i32, y: i32) -> AgentState {
        AgentState::at(grid.vertex_at(x, y).unwrap())
    }

    pub fn instance(
        grid:   Arc<Grid>,
        starts: Vec<AgentState>,
        goals:  Vec<AgentState>,
    ) -> Arc<Instance> {
        Arc::new(Instance::from_states(grid, starts, goals).unwrap())
    }

    pub fn config() -> PlannerConfig {
        PlannerConfig::default()
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use mapf_plan::Plan;

    use crate::{make_solver, Solver, SolverError, SolverRegistry, SolverResult};

    #[test]
    fn pibt_is_registered_by_default() {
        let registry = SolverRegistry::default();
        assert!(registry.strategies().any(|s| s == "PIBT"));

        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 2)],
        );
        let solver = make_solver(inst, &super::helpers::config()).unwrap();
        assert_eq!(solver.name(), "PIBT");
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 2)],
        );
        let mut config = super::helpers::config();
        config.strategy = "CBS".into();
        let err = make_solver(inst, &config).unwrap_err();
        assert!(matches!(err, SolverError::UnknownStrategy(name) if name == "CBS"));
    }

    #[test]
    fn custom_strategies_can_be_registered() {
        struct HoldStill {
            ran: bool,
        }
        impl Solver for HoldStill {
            fn name(&self) -> &'static str {
                "HOLD"
            }
            fn solve(&mut self) {
                self.ran = true;
            }
            fn succeeded(&self) -> bool {
                self.ran
            }
            fn plan(&self) -> SolverResult<&Plan> {
                Err(SolverError::NotSolved)
            }
            fn elapsed_ms(&self) -> u64 {
                0
            }
        }

        let mut registry = SolverRegistry::empty();
        registry.register("HOLD", |_, _| Box::new(HoldStill { ran: false }));

        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 2)],
        );
        let mut config = super::helpers::config();
        config.strategy = "HOLD".into();
        let mut solver = registry.make(inst, &config).unwrap();
        solver.solve();
        assert_eq!(solver.name(), "HOLD");
        assert!(solver.succeeded());
        // The default registry does not know about it.
        assert!(matches!(
            make_solver(
                super::helpers::instance(
                    super::helpers::open_grid(3, 3),
                    vec![],
                    vec![]
                ),
                &config
            ),
            Err(SolverError::UnknownStrategy(_))
        ));
    }
}

// ── Solver contract ───────────────────────────────────────────────────────────

#[cfg(test)]
mod contract {
    use crate::{make_solver, SolverError};

    #[test]
    fn plan_before_solve_is_not_solved() {
        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 2)],
        );
        let solver = make_solver(inst, &super::helpers::config()).unwrap();
        assert!(!solver.succeeded());
        assert!(matches!(solver.plan(), Err(SolverError::NotSolved)));
    }

    #[test]
    fn failed_runs_still_expose_their_partial_plan() {
        // Two agents swapping ends of a 2-cell corridor: unsolvable, and the
        // stall detector ends the run long before the timestep budget.
        let grid = super::helpers::open_grid(2, 1);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![
                super::helpers::headless(&grid, 0, 0),
                super::helpers::headless(&grid, 1, 0),
            ],
            vec![
                super::helpers::headless(&grid, 1, 0),
                super::helpers::headless(&grid, 0, 0),
            ],
        );
        let mut config = super::helpers::config();
        config.stall_limit = 3;
        let mut solver = make_solver(inst.clone(), &config).unwrap();
        solver.solve();

        assert!(!solver.succeeded());
        let plan = solver.plan().unwrap();
        assert!(!plan.is_empty());
        assert_eq!(plan.size(), 2);
        assert!(plan.makespan() <= 4, "stall detection should cut the run short");
        assert!(!plan.validate(&inst));
    }

    #[test]
    fn timestep_budget_bounds_unsolvable_runs() {
        // Goal in a region the agent cannot reach: the run must still
        // terminate, at the timestep budget.
        let grid = std::sync::Arc::new(
            mapf_grid::Grid::parse("height 3\nwidth 3\nmap\n.@.\n.@.\n.@.\n").unwrap(),
        );
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 0)],
        );
        let mut config = super::helpers::config();
        config.max_timestep = 50;
        config.stall_limit = 0; // disabled: exercise the timestep bound alone
        let mut solver = make_solver(inst, &config).unwrap();
        solver.solve();
        assert!(!solver.succeeded());
        assert_eq!(solver.plan().unwrap().makespan(), 50);
    }

    #[test]
    fn same_seed_same_plan() {
        let grid = super::helpers::open_grid(8, 8);
        let mut rng = mapf_core::PlannerRng::new(123);
        let inst = std::sync::Arc::new(
            mapf_instance::Instance::random(grid, 6, &mut rng).unwrap(),
        );
        let config = super::helpers::config();

        let mut a = crate::make_solver(inst.clone(), &config).unwrap();
        let mut b = crate::make_solver(inst, &config).unwrap();
        a.solve();
        b.solve();
        assert_eq!(a.succeeded(), b.succeeded());
        assert_eq!(a.plan().unwrap(), b.plan().unwrap());
    }

    #[test]
    fn successful_plans_never_conflict() {
        // The no-conflict property: whenever PIBT reports success, the plan
        // must survive full validation.
        for seed in [1u64, 7, 42] {
            let grid = super::helpers::open_grid(8, 8);
            let mut rng = mapf_core::PlannerRng::new(seed);
            let inst = std::sync::Arc::new(
                mapf_instance::Instance::random(grid, 6, &mut rng).unwrap(),
            );
            let mut config = super::helpers::config();
            config.seed = seed;
            let mut solver = crate::make_solver(inst.clone(), &config).unwrap();
            solver.solve();
            let plan = solver.plan().unwrap();
            if solver.succeeded() {
                assert!(plan.validate(&inst), "seed {seed} produced a conflicting plan");
            } else {
                assert!(!plan.is_empty());
            }
        }
    }
}

// ── Lower bounds ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounds {
    use crate::{lower_bounds, LowerBounds};

    #[test]
    fn open_grid_bounds_are_manhattan() {
        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![
                super::helpers::headless(&grid, 0, 0),
                super::helpers::headless(&grid, 2, 2),
            ],
            vec![
                super::helpers::headless(&grid, 2, 2),
                super::helpers::headless(&grid, 2, 0),
            ],
        );
        assert_eq!(
            lower_bounds(&inst),
            Some(LowerBounds { sum_of_costs: 6, makespan: 4 })
        );
    }

    #[test]
    fn unreachable_goal_has_no_bound() {
        let grid = std::sync::Arc::new(
            mapf_grid::Grid::parse("height 3\nwidth 3\nmap\n.@.\n.@.\n.@.\n").unwrap(),
        );
        let inst = super::helpers::instance(
            grid.clone(),
            vec![super::helpers::headless(&grid, 0, 0)],
            vec![super::helpers::headless(&grid, 2, 0)],
        );
        assert_eq!(lower_bounds(&inst), None);
    }

    #[test]
    fn successful_plans_respect_the_makespan_bound() {
        let grid = super::helpers::open_grid(8, 8);
        let mut rng = mapf_core::PlannerRng::new(5);
        let inst = std::sync::Arc::new(
            mapf_instance::Instance::random(grid, 4, &mut rng).unwrap(),
        );
        let bounds = lower_bounds(&inst).unwrap();
        let mut solver = crate::make_solver(inst.clone(), &super::helpers::config()).unwrap();
        solver.solve();
        if solver.succeeded() {
            assert!(solver.plan().unwrap().makespan() >= bounds.makespan);
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use mapf_core::{AgentState, Orientation};
    use mapf_plan::Plan;

    use crate::make_solver;

    #[test]
    fn two_agents_swap_corners_of_an_open_grid() {
        // Opposite corners of a 3×3, goals exchanged.  Omnidirectional
        // agents can pass on separate diagonals, so makespan 4 is reachable.
        let grid = super::helpers::open_grid(3, 3);
        let inst = super::helpers::instance(
            grid.clone(),
            vec![
                super::helpers::headless(&grid, 0, 0),
                super::helpers::headless(&grid, 2, 2),
            ],
            vec![
                super::helpers::headless(&grid, 2, 2),
                super::helpers::headless(&grid, 0, 0),
            ],
        );
        let mut solver = make_solver(inst.clone(), &super::helpers::config()).unwrap();
        solver.solve();

        assert!(solver.succeeded());
        let plan = solver.plan().unwrap();
        assert!(plan.makespan() <= 4);
        assert!(plan.validate(&inst));
    }

    #[test]
    fn three_pickers_share_one_station() {
        // Three oriented agents converging on the same goal state on a
        // warehouse floor; they must arrive one after another.
        let grid = super::helpers::warehouse();
        let state = |x: i32, y: i32, h: u8| {
            AgentState::oriented(
                grid.vertex_at(x, y).unwrap(),
                Orientation::from_index(h).unwrap(),
            )
        };
        let inst = super::helpers::instance(
            grid.clone(),
            vec![state(9, 17, 3), state(25, 17, 1), state(17, 9, 0)],
            vec![state(17, 18, 0), state(17, 18, 0), state(17, 18, 0)],
        );
        let mut solver = make_solver(inst.clone(), &super::helpers::config()).unwrap();
        solver.solve();

        assert!(solver.succeeded());
        let plan = solver.plan().unwrap();
        assert_eq!(plan.size(), 3);
        assert!(plan.validate(&inst));

        // The produced plan survives a save/load round trip unchanged.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warehouse.plan");
        plan.save(&grid, &path).unwrap();
        let loaded = Plan::load(&grid, &path).unwrap();
        assert_eq!(&loaded, plan);
        assert!(loaded.validate(&inst));
    }

    #[test]
    fn agent_already_at_its_goal() {
        // Start == goal: a single-configuration plan with makespan 0.
        let grid = super::helpers::open_grid(3, 3);
        let s = AgentState::oriented(grid.vertex_at(1, 1).unwrap(), Orientation::South);
        let inst = super::helpers::instance(grid, vec![s], vec![s]);
        let mut solver = make_solver(inst.clone(), &super::helpers::config()).unwrap();
        solver.solve();

        assert!(solver.succeeded());
        let plan = solver.plan().unwrap();
        assert_eq!(plan.makespan(), 0);
        assert_eq!(plan.path(0).len(), 1);
        assert!(plan.validate(&inst));
    }

    #[test]
    fn oriented_agent_turns_toward_its_goal_heading() {
        // Same cell, opposite heading: two rotations, makespan 2.
        let grid = super::helpers::open_grid(3, 3);
        let v = grid.vertex_at(1, 1).unwrap();
        let inst = super::helpers::instance(
            grid,
            vec![AgentState::oriented(v, Orientation::North)],
            vec![AgentState::oriented(v, Orientation::South)],
        );
        let mut solver = make_solver(inst.clone(), &super::helpers::config()).unwrap();
        solver.solve();

        assert!(solver.succeeded());
        let plan = solver.plan().unwrap();
        assert_eq!(plan.makespan(), 2);
        assert!(plan.validate(&inst));
    }
}
