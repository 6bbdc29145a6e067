use std::collections::{BTreeSet, VecDeque};

use lattice_percolation::domain::graph::{EdgeMask, GridGraph};
use lattice_percolation::domain::model::{PathOutcome, Retention};
use lattice_percolation::domain::traits::{ComponentAnalyzer, PathFinder};
use lattice_percolation::infrastructure::bfs_path::{all_shortest_paths, BfsPathFinder};
use lattice_percolation::infrastructure::union_find::UnionFindAnalyzer;
use lattice_percolation::usecase::simulate::run::PercolationRun;
use lattice_percolation::usecase::simulate::sample::sample_mask;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Cut pairs written out from the layout rule, independent of `GridGraph`.
fn cut_pairs(side: usize, cut: &[usize]) -> BTreeSet<(usize, usize)> {
    let horizontal = side * (side - 1);
    cut.iter()
        .map(|&e| {
            if e < horizontal {
                let (y, x) = (e / (side - 1), e % (side - 1));
                (x + y * side, x + 1 + y * side)
            } else {
                let v = e - horizontal;
                let (y, x) = (v / side, v % side);
                (x + y * side, x + (y + 1) * side)
            }
        })
        .collect()
}

fn brute_force_hops(side: usize, cut: &[usize], s: usize, t: usize) -> Option<usize> {
    let cut = cut_pairs(side, cut);
    let live = |a: usize, b: usize| !cut.contains(&(a.min(b), a.max(b)));

    let mut dist = vec![None; side * side];
    dist[s] = Some(0);
    let mut queue = VecDeque::from([s]);
    while let Some(u) = queue.pop_front() {
        let (x, y) = (u % side, u / side);
        let mut next = Vec::new();
        if x > 0 {
            next.push(u - 1);
        }
        if x + 1 < side {
            next.push(u + 1);
        }
        if y > 0 {
            next.push(u - side);
        }
        if y + 1 < side {
            next.push(u + side);
        }
        for v in next {
            if dist[v].is_none() && live(u, v) {
                dist[v] = dist[u].map(|d: usize| d + 1);
                queue.push_back(v);
            }
        }
    }
    dist[t]
}

#[test]
fn fixed_mask_on_seven_by_seven_lattice() {
    let cut = [3, 17, 40];
    let g = GridGraph::new(7).expect("grid");
    assert_eq!(g.edge_count(), 84);
    let mask = EdgeMask::from_indices(g.edge_count(), cut).expect("mask");
    let run = PercolationRun::new(g, mask, &UnionFindAnalyzer).expect("run");

    // Three scattered cuts cannot disconnect a 7x7 lattice.
    assert_eq!(run.components().len(), 1);
    assert_eq!(run.giant_component().len(), 49);

    let outcome = run.shortest_path(&BfsPathFinder, 13, 45).expect("path");
    let path = outcome.path().expect("13 and 45 stay connected");
    assert_eq!(Some(path.hop_count()), brute_force_hops(7, &cut, 13, 45));
    assert_eq!(path.source(), 13);
    assert_eq!(path.target(), 45);
    for hop in path.nodes().windows(2) {
        assert!(run.view().are_adjacent(hop[0], hop[1]));
    }
}

#[test]
fn bfs_agrees_with_brute_force_on_sampled_masks() {
    let side = 9;
    let g = GridGraph::new(side).expect("grid");
    let p = Retention::new(0.55).expect("p");

    for seed in 0..20u64 {
        let mask = sample_mask(&g, p, &mut StdRng::seed_from_u64(seed));
        let cut = mask.cut_indices();
        let view = g.prune(&mask).expect("view");
        for (s, t) in [(0, 80), (40, 8), (13, 67), (5, 5)] {
            let got = BfsPathFinder
                .shortest_path(&view, s, t)
                .expect("valid nodes")
                .path()
                .map(|p| p.hop_count());
            assert_eq!(got, brute_force_hops(side, &cut, s, t), "seed {seed} {s}->{t}");
        }
    }
}

#[test]
fn components_partition_every_node_once() {
    let g = GridGraph::new(12).expect("grid");
    let p = Retention::new(0.5).expect("p");

    for seed in 0..10u64 {
        let mask = sample_mask(&g, p, &mut StdRng::seed_from_u64(seed));
        let view = g.prune(&mask).expect("view");
        let partition = UnionFindAnalyzer.compute_components(&view);

        let total: usize = partition.sizes().iter().sum();
        assert_eq!(total, g.node_count());

        let mut seen = vec![false; g.node_count()];
        for component in partition.components() {
            for &n in component {
                assert!(!seen[n], "node {n} listed twice");
                seen[n] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));

        // Live edges never cross components.
        for (e, &(a, b)) in g.edges().iter().enumerate() {
            if view.is_live(e) {
                assert!(partition.same_component(a, b));
            }
        }

        let max = partition.sizes().into_iter().max().expect("non-empty");
        assert_eq!(partition.giant().len(), max);
    }
}

#[test]
fn full_retention_gives_manhattan_paths() {
    let g = GridGraph::new(6).expect("grid");
    let mask = sample_mask(&g, Retention::new(1.0).expect("p"), &mut StdRng::seed_from_u64(0));
    let view = g.prune(&mask).expect("view");

    let partition = UnionFindAnalyzer.compute_components(&view);
    assert_eq!(partition.giant().len(), 36);

    for s in [0, 7, 20, 35] {
        for t in 0..36 {
            let hops = BfsPathFinder
                .shortest_path(&view, s, t)
                .expect("path")
                .path()
                .map(|p| p.hop_count());
            assert_eq!(hops, Some(g.manhattan_distance(s, t).expect("in range")));
        }
    }
}

#[test]
fn zero_retention_isolates_every_node() {
    let g = GridGraph::new(5).expect("grid");
    let mask = sample_mask(&g, Retention::new(0.0).expect("p"), &mut StdRng::seed_from_u64(0));
    let view = g.prune(&mask).expect("view");

    let partition = UnionFindAnalyzer.compute_components(&view);
    assert_eq!(partition.len(), 25);
    assert!(partition.sizes().iter().all(|&s| s == 1));
    assert_eq!(partition.giant(), &[0]);

    assert_eq!(
        BfsPathFinder.shortest_path(&view, 0, 24).expect("valid"),
        PathOutcome::Unreachable
    );
    assert_eq!(
        BfsPathFinder.shortest_path(&view, 3, 3).expect("valid").path().map(|p| p.hop_count()),
        Some(0)
    );
}

#[test]
fn all_shortest_paths_share_the_bfs_length() {
    let g = GridGraph::new(7).expect("grid");
    let mask = EdgeMask::from_indices(g.edge_count(), [3, 17, 40]).expect("mask");
    let view = g.prune(&mask).expect("view");

    let hops = brute_force_hops(7, &[3, 17, 40], 13, 45).expect("connected");
    let paths = all_shortest_paths(&view, 13, 45, 1000).expect("paths");
    assert!(!paths.is_empty());
    assert!(paths.iter().all(|p| p.hop_count() == hops));

    let mut sorted = paths.clone();
    sorted.sort_by(|a, b| a.nodes().cmp(b.nodes()));
    assert_eq!(sorted, paths);
}
