//! Memoryless random walks over live edges.

use crate::domain::error::Result;
use crate::domain::graph::{GridGraph, PrunedGraph};
use crate::domain::model::{Trajectory, WalkOutcome};
use rand::Rng;

/// `count` start nodes drawn uniformly over the whole lattice.
pub fn random_origins<R: Rng>(graph: &GridGraph, count: usize, rng: &mut R) -> Vec<usize> {
    (0..count)
        .map(|_| rng.gen_range(0..graph.node_count()))
        .collect()
}

/// Advance every walker `steps` times, each step to a uniformly chosen live
/// neighbour.
///
/// Starts without live neighbours are set aside before the first step and
/// reported in [`WalkOutcome::dropped`]. Walkers move in lockstep: for each
/// step, one draw per surviving walker in start order. Walkers do not
/// interact and may share a node.
pub fn simulate_walks<R: Rng>(
    view: &PrunedGraph<'_>,
    starts: &[usize],
    steps: usize,
    rng: &mut R,
) -> Result<WalkOutcome> {
    for &s in starts {
        view.check_node(s)?;
    }

    let mut outcome = WalkOutcome::default();
    for &s in starts {
        if view.degree(s) == 0 {
            outcome.dropped.push(s);
            continue;
        }
        let mut nodes = Vec::with_capacity(steps + 1);
        nodes.push(s);
        outcome.trajectories.push(Trajectory { nodes });
    }

    // Every node reached over a live edge keeps that edge, so no walker can
    // get stuck after the start check above.
    let mut neighbors = Vec::with_capacity(4);
    for _ in 0..steps {
        for walker in outcome.trajectories.iter_mut() {
            neighbors.clear();
            neighbors.extend(view.neighbors(walker.end()));
            let next = neighbors[rng.gen_range(0..neighbors.len())];
            walker.nodes.push(next);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::LatticeError;
    use crate::domain::graph::EdgeMask;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_hop_follows_a_live_edge() {
        let g = GridGraph::new(8).expect("grid");
        // Thin the lattice a little so walks see boundaries and dead ends.
        let mask = EdgeMask::from_indices(g.edge_count(), (0..g.edge_count()).step_by(3))
            .expect("mask");
        let view = g.prune(&mask).expect("view");
        let mut rng = StdRng::seed_from_u64(17);
        let starts = random_origins(&g, 12, &mut rng);

        let out = simulate_walks(&view, &starts, 50, &mut rng).expect("walk");
        assert_eq!(out.trajectories.len() + out.dropped.len(), starts.len());
        for t in &out.trajectories {
            assert_eq!(t.len(), 51);
            for hop in t.nodes.windows(2) {
                assert!(view.are_adjacent(hop[0], hop[1]), "hop {hop:?}");
            }
        }
    }

    #[test]
    fn zero_steps_yields_start_only() {
        let g = GridGraph::new(3).expect("grid");
        let out = simulate_walks(&g.unpruned(), &[4, 0], 0, &mut StdRng::seed_from_u64(0))
            .expect("walk");
        assert_eq!(
            out.trajectories,
            vec![Trajectory { nodes: vec![4] }, Trajectory { nodes: vec![0] }]
        );
    }

    #[test]
    fn isolated_starts_are_dropped_up_front() {
        let g = GridGraph::new(3).expect("grid");
        let mask = EdgeMask::all(g.edge_count());
        let view = g.prune(&mask).expect("view");
        let out = simulate_walks(&view, &[0, 4, 4], 10, &mut StdRng::seed_from_u64(0))
            .expect("walk");
        assert!(out.trajectories.is_empty());
        assert_eq!(out.dropped, vec![0, 4, 4]);
    }

    #[test]
    fn walkers_may_share_nodes() {
        // On a 2x2 lattice with one live edge, both walkers bounce on it.
        let g = GridGraph::new(2).expect("grid");
        let mask = EdgeMask::from_indices(g.edge_count(), [1, 2, 3]).expect("mask");
        let view = g.prune(&mask).expect("view");
        let out = simulate_walks(&view, &[0, 0, 3], 4, &mut StdRng::seed_from_u64(9))
            .expect("walk");

        assert_eq!(out.dropped, vec![3]);
        for t in &out.trajectories {
            assert_eq!(t.nodes, vec![0, 1, 0, 1, 0]);
        }
    }

    #[test]
    fn same_seed_gives_same_trajectories() {
        let g = GridGraph::new(6).expect("grid");
        let view = g.unpruned();
        let a = simulate_walks(&view, &[0, 20, 35], 30, &mut StdRng::seed_from_u64(4))
            .expect("walk");
        let b = simulate_walks(&view, &[0, 20, 35], 30, &mut StdRng::seed_from_u64(4))
            .expect("walk");
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_start_is_a_configuration_error() {
        let g = GridGraph::new(3).expect("grid");
        let err =
            simulate_walks(&g.unpruned(), &[9], 1, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, LatticeError::NodeOutOfRange { index: 9, .. }));
    }

    #[test]
    fn origins_stay_in_range() {
        let g = GridGraph::new(15).expect("grid");
        let origins = random_origins(&g, 200, &mut StdRng::seed_from_u64(2));
        assert_eq!(origins.len(), 200);
        assert!(origins.iter().all(|&o| o < 225));
    }
}
