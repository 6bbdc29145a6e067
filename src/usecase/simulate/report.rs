//! Serializable snapshot of a finished run, consumed by renderers and by
//! `percolation validate`.

use crate::domain::model::{Node, PathOutcome, Trajectory};
use crate::usecase::simulate::run::PercolationRun;
use crate::usecase::simulate::sample::MaskSource;
use crate::usecase::stats::RunStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub side: usize,
    pub retention: f64,
    pub seed: u64,
    pub cache_key: String,
    pub mask_source: MaskSource,

    /// Node coordinates by node index.
    pub nodes: Vec<Node>,

    /// Edge endpoints by edge index.
    pub edges: Vec<(usize, usize)>,

    pub cut_edges: Vec<usize>,
    pub components: Vec<Vec<usize>>,
    pub giant_component: usize,

    #[serde(default)]
    pub path: Option<PathReport>,

    #[serde(default)]
    pub walks: Option<WalkReport>,

    pub stats: RunStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReport {
    pub source: usize,
    pub target: usize,
    pub outcome: PathOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkReport {
    pub steps: usize,
    /// Every requested start, in order, including the dropped ones.
    pub starts: Vec<usize>,
    pub trajectories: Vec<Trajectory>,
    pub dropped: Vec<usize>,
}

impl SimulationReport {
    /// Lattice, mask and partition fields taken from `run`; the rest is
    /// filled in by the caller.
    pub fn from_run(
        run: &PercolationRun,
        retention: f64,
        seed: u64,
        cache_key: String,
        mask_source: MaskSource,
    ) -> Self {
        Self {
            side: run.graph().side(),
            retention,
            seed,
            cache_key,
            mask_source,
            nodes: run.nodes(),
            edges: run.edges().to_vec(),
            cut_edges: run.cut_edge_indices(),
            components: run.components().to_vec(),
            giant_component: run.giant_component_index(),
            path: None,
            walks: None,
            stats: RunStats::default(),
        }
    }
}
