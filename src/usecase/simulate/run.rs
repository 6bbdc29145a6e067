//! Read-only query surface over one percolation trial.

use crate::domain::error::Result;
use crate::domain::graph::{ComponentPartition, EdgeMask, GridGraph, PrunedGraph};
use crate::domain::model::{Node, PathOutcome, WalkOutcome};
use crate::domain::traits::{ComponentAnalyzer, PathFinder};
use crate::usecase::simulate::walk::simulate_walks;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A base lattice, the mask applied to it, and the resulting components.
///
/// Everything a renderer needs is pulled from here by node or edge index.
#[derive(Debug, Clone)]
pub struct PercolationRun {
    graph: GridGraph,
    mask: EdgeMask,
    partition: ComponentPartition,
}

impl PercolationRun {
    pub fn new(graph: GridGraph, mask: EdgeMask, analyzer: &dyn ComponentAnalyzer) -> Result<Self> {
        let partition = analyzer.compute_components(&graph.prune(&mask)?);
        Ok(Self {
            graph,
            mask,
            partition,
        })
    }

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn mask(&self) -> &EdgeMask {
        &self.mask
    }

    pub fn view(&self) -> PrunedGraph<'_> {
        self.graph.masked_view(&self.mask)
    }

    pub fn partition(&self) -> &ComponentPartition {
        &self.partition
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        self.graph.edges()
    }

    pub fn cut_edge_indices(&self) -> Vec<usize> {
        self.mask.cut_indices()
    }

    pub fn components(&self) -> &[Vec<usize>] {
        self.partition.components()
    }

    pub fn giant_component_index(&self) -> usize {
        self.partition.giant_index()
    }

    pub fn giant_component(&self) -> &[usize] {
        self.partition.giant()
    }

    pub fn shortest_path(
        &self,
        finder: &dyn PathFinder,
        source: usize,
        target: usize,
    ) -> Result<PathOutcome> {
        finder.shortest_path(&self.view(), source, target)
    }

    /// Walks driven by a fresh generator seeded with `seed`.
    pub fn walk_trajectories(
        &self,
        starts: &[usize],
        steps: usize,
        seed: u64,
    ) -> Result<WalkOutcome> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.walk_trajectories_with(starts, steps, &mut rng)
    }

    /// Walks driven by a caller-owned generator, continuing its stream.
    pub fn walk_trajectories_with<R: Rng>(
        &self,
        starts: &[usize],
        steps: usize,
        rng: &mut R,
    ) -> Result<WalkOutcome> {
        simulate_walks(&self.view(), starts, steps, rng)
    }
}
