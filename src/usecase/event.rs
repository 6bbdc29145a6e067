use crate::usecase::stats::RunStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    PhaseStarted {
        name: String,
    },
    PhaseFinished {
        name: String,
    },

    MaskLoaded {
        key: String,
        cut_edges: usize,
    },

    MaskSampled {
        key: String,
        edges: usize,
        cut_edges: usize,
    },

    MaskPersistFailed {
        key: String,
        error: String,
    },

    ComponentsComputed {
        nodes: usize,
        live_edges: usize,
        components: usize,
        giant_size: usize,
        isolated_nodes: usize,
    },

    PathComputed {
        source: usize,
        target: usize,
        hops: Option<usize>,
    },

    WalkersDropped {
        starts: Vec<usize>,
    },

    WalksSimulated {
        walkers: usize,
        steps: usize,
    },

    Finished {
        stats: RunStats,
    },
}
