//! Unit tests for mapf-core primitives.

#[cfg(test)]
mod ids {
    use crate::VertexId;

    #[test]
    fn index_roundtrip() {
        let v = VertexId(37);
        assert_eq!(v.index(), 37);
        assert_eq!(VertexId::try_from(37usize).unwrap(), v);
    }

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(VertexId::default(), VertexId::INVALID);
        assert_eq!(VertexId::INVALID.0, u32::MAX);
    }

    #[test]
    fn ordering_follows_inner() {
        assert!(VertexId(0) < VertexId(1));
        assert!(VertexId(0) < VertexId::INVALID);
    }
}

#[cfg(test)]
mod orientation {
    use crate::Orientation;

    #[test]
    fn channel_indices_match_deltas() {
        // Channel order is the map format's: +y, −x, −y, +x.
        assert_eq!(Orientation::North.delta(), (0, 1));
        assert_eq!(Orientation::West.delta(), (-1, 0));
        assert_eq!(Orientation::South.delta(), (0, -1));
        assert_eq!(Orientation::East.delta(), (1, 0));
        for (i, o) in Orientation::ALL.iter().enumerate() {
            assert_eq!(o.index(), i);
            assert_eq!(Orientation::from_index(i as u8).unwrap(), *o);
        }
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert!(Orientation::from_index(4).is_err());
        assert!(Orientation::from_index(255).is_err());
    }

    #[test]
    fn four_lefts_make_a_circle() {
        let mut o = Orientation::East;
        for _ in 0..4 {
            o = o.left();
        }
        assert_eq!(o, Orientation::East);
        assert_eq!(Orientation::North.left(), Orientation::West);
        assert_eq!(Orientation::North.right(), Orientation::East);
    }

    #[test]
    fn left_and_right_invert() {
        for o in Orientation::ALL {
            assert_eq!(o.left().right(), o);
            assert_eq!(o.right().left(), o);
        }
    }

    #[test]
    fn steps_to_counts_ccw() {
        use Orientation::*;
        assert_eq!(North.steps_to(North), 0);
        assert_eq!(North.steps_to(West), 1);
        assert_eq!(North.steps_to(South), 2);
        assert_eq!(North.steps_to(East), 3);
    }

    #[test]
    fn from_delta_inverts_delta() {
        for o in Orientation::ALL {
            let (dx, dy) = o.delta();
            assert_eq!(Orientation::from_delta(dx, dy), Some(o));
        }
        assert_eq!(Orientation::from_delta(1, 1), None);
        assert_eq!(Orientation::from_delta(0, 0), None);
    }
}

#[cfg(test)]
mod state {
    use crate::{AgentState, Orientation, VertexId};

    #[test]
    fn equality_is_componentwise() {
        let a = AgentState::oriented(VertexId(3), Orientation::East);
        let b = AgentState::oriented(VertexId(3), Orientation::East);
        assert_eq!(a, b);
        assert_ne!(a, a.facing(Orientation::North));
        assert_ne!(a, a.moved_to(VertexId(4)));
        assert_ne!(a, AgentState::at(VertexId(3)));
    }

    #[test]
    fn facing_and_moved_to_preserve_the_other_component() {
        let a = AgentState::oriented(VertexId(9), Orientation::South);
        assert_eq!(a.facing(Orientation::West).vertex, VertexId(9));
        assert_eq!(a.moved_to(VertexId(10)).heading, Some(Orientation::South));
    }
}

#[cfg(test)]
mod rng {
    use crate::PlannerRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = PlannerRng::new(7);
        let mut b = PlannerRng::new(7);
        let xs: Vec<u64> = (0..8).map(|_| a.random::<u64>()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random::<u64>()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_with_distinct_offsets_diverge() {
        let mut root1 = PlannerRng::new(7);
        let mut root2 = PlannerRng::new(7);
        let mut a = root1.child(1);
        let mut b = root2.child(2);
        let xs: Vec<u64> = (0..8).map(|_| a.random::<u64>()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random::<u64>()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = PlannerRng::new(99);
        let mut v: Vec<u32> = (0..32).collect();
        rng.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod config {
    use crate::PlannerConfig;

    #[test]
    fn defaults_match_documented_surface() {
        let c = PlannerConfig::default();
        assert_eq!(c.strategy, "PIBT");
        assert!(c.with_weights);
        assert!(!c.verbose);
        assert_eq!(c.max_timestep, 10_000);
        assert_eq!(c.max_comp_time_ms, 1_000);
        assert_eq!(c.seed, 42);
    }
}
