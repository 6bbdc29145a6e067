use crate::domain::error::{MaskStoreError, Result};
use crate::domain::graph::{ComponentPartition, PrunedGraph};
use crate::domain::model::{MaskRecord, PathOutcome};

pub trait ComponentAnalyzer {
    fn compute_components(&self, view: &PrunedGraph<'_>) -> ComponentPartition;
}

pub trait PathFinder {
    /// Fails only on invalid node indices; disconnected endpoints yield
    /// [`PathOutcome::Unreachable`].
    fn shortest_path(
        &self,
        view: &PrunedGraph<'_>,
        source: usize,
        target: usize,
    ) -> Result<PathOutcome>;
}

/// Keyed persistence for sampled edge masks.
pub trait MaskStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> std::result::Result<Option<MaskRecord>, MaskStoreError>;

    fn save(&self, key: &str, record: &MaskRecord) -> std::result::Result<(), MaskStoreError>;
}
