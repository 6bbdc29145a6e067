use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub nodes: usize,
    pub edges: usize,
    pub cut_edges: usize,
    pub components: usize,
    pub giant_size: usize,
    pub isolated_nodes: usize,
    pub path_hops: Option<usize>,
    pub walkers: usize,
    pub dropped_walkers: usize,
    pub steps: usize,
}
