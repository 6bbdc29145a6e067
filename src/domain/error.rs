//! Configuration errors raised before a simulation starts.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LatticeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    #[error("lattice side length must be at least 2, got {0}")]
    SideTooSmall(usize),

    #[error("lattice side length {0} is too large: node or edge count overflows")]
    SideTooLarge(usize),

    #[error("retention probability must lie in {expected}, got {value}")]
    InvalidProbability { value: f64, expected: &'static str },

    #[error("node index {index} out of range for a lattice with {node_count} nodes")]
    NodeOutOfRange { index: usize, node_count: usize },

    #[error("coordinate ({x}, {y}) outside a lattice of side {side}")]
    CoordinateOutOfRange { x: usize, y: usize, side: usize },

    #[error("edge index {index} out of range for a lattice with {edge_count} edges")]
    EdgeOutOfRange { index: usize, edge_count: usize },

    #[error("edge index {0} listed more than once")]
    DuplicateEdge(usize),

    #[error("edge mask covers {mask_edges} edges but the lattice has {graph_edges}")]
    MaskMismatch { mask_edges: usize, graph_edges: usize },
}

/// Cache store failures. The sampler recovers from all of them.
#[derive(Debug, Error)]
pub enum MaskStoreError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache record failed schema validation:\n{0}")]
    Schema(String),

    #[error("cache record does not match the lattice: {0}")]
    Mismatch(String),
}
