//! Unit tests for mapf-instance.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use mapf_grid::Grid;

    pub fn open_3x3() -> Arc<Grid> {
        Arc::new(Grid::parse("height 3\nwidth 3\nmap\n...\n...\n...\n").unwrap())
    }

    pub fn single_cell() -> Arc<Grid> {
        Arc::new(Grid::parse("height 1\nwidth 1\nmap\n.\n").unwrap())
    }
}

#[cfg(test)]
mod explicit {
    use mapf_core::{AgentState, Orientation, VertexId};

    use crate::{Instance, InstanceError};

    #[test]
    fn accessors_return_supplied_sequences() {
        let grid = super::helpers::open_3x3();
        let starts = vec![
            AgentState::oriented(grid.vertex_at(0, 0).unwrap(), Orientation::East),
            AgentState::at(grid.vertex_at(2, 2).unwrap()),
        ];
        let goals = vec![
            AgentState::oriented(grid.vertex_at(2, 0).unwrap(), Orientation::North),
            AgentState::at(grid.vertex_at(0, 2).unwrap()),
        ];
        let inst = Instance::from_states(grid, starts.clone(), goals.clone()).unwrap();
        assert_eq!(inst.agent_count(), 2);
        assert_eq!(inst.starts(), &starts[..]);
        assert_eq!(inst.goals(), &goals[..]);
        assert_eq!(inst.start(1), starts[1]);
        assert_eq!(inst.goal(0), goals[0]);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let grid = super::helpers::open_3x3();
        let s = vec![AgentState::at(grid.vertex_at(0, 0).unwrap())];
        let err = Instance::from_states(grid, s, vec![]).unwrap_err();
        assert!(matches!(err, InstanceError::MismatchedLength { starts: 1, goals: 0 }));
    }

    #[test]
    fn out_of_range_vertex_rejected() {
        let grid = super::helpers::open_3x3();
        let s = vec![AgentState::at(VertexId(99))];
        let g = vec![AgentState::at(grid.vertex_at(0, 0).unwrap())];
        let err = Instance::from_states(grid, s, g).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidState { agent: 0, which: "start", .. }));
    }

    #[test]
    fn obstacle_goal_rejected() {
        let grid = std::sync::Arc::new(
            mapf_grid::Grid::parse("height 1\nwidth 2\nmap\n.@\n").unwrap(),
        );
        let s = vec![AgentState::at(grid.vertex_at(0, 0).unwrap())];
        let g = vec![AgentState::at(VertexId(1))]; // the obstacle cell
        let err = Instance::from_states(grid, s, g).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidState { which: "goal", .. }));
    }
}

#[cfg(test)]
mod random {
    use std::collections::HashSet;

    use mapf_core::PlannerRng;

    use crate::{Instance, InstanceError};

    #[test]
    fn sampled_instances_are_collision_free() {
        let grid = super::helpers::open_3x3();
        let mut rng = PlannerRng::new(7);
        let inst = Instance::random(grid.clone(), 5, &mut rng).unwrap();
        assert_eq!(inst.agent_count(), 5);

        let start_vs: HashSet<_> = inst.starts().iter().map(|s| s.vertex).collect();
        let goal_vs: HashSet<_> = inst.goals().iter().map(|s| s.vertex).collect();
        assert_eq!(start_vs.len(), 5, "starts must be distinct");
        assert_eq!(goal_vs.len(), 5, "goals must be distinct");
        for i in 0..5 {
            assert!(grid.is_vertex(inst.start(i).vertex));
            assert!(grid.is_vertex(inst.goal(i).vertex));
            assert_ne!(inst.start(i).vertex, inst.goal(i).vertex);
        }
    }

    #[test]
    fn same_seed_reproduces_the_instance() {
        let grid = super::helpers::open_3x3();
        let a = Instance::random(grid.clone(), 4, &mut PlannerRng::new(11)).unwrap();
        let b = Instance::random(grid, 4, &mut PlannerRng::new(11)).unwrap();
        assert_eq!(a.starts(), b.starts());
        assert_eq!(a.goals(), b.goals());
    }

    #[test]
    fn too_many_agents_fails_not_underallocates() {
        let grid = super::helpers::open_3x3();
        let err = Instance::random(grid, 10, &mut PlannerRng::new(1)).unwrap_err();
        assert!(matches!(
            err,
            InstanceError::InfeasibleSampling { requested: 10, free: 9 }
        ));
    }

    #[test]
    fn single_free_vertex_cannot_host_an_agent() {
        // One cell: the goal can never differ from the start.
        let grid = super::helpers::single_cell();
        let err = Instance::random(grid, 1, &mut PlannerRng::new(3)).unwrap_err();
        assert!(matches!(err, InstanceError::InfeasibleSampling { .. }));
    }
}
