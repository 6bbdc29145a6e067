use crate::domain::error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Integer lattice site `(x, y)` with `0 <= x, y < L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub x: usize,
    pub y: usize,
}

impl Node {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &Node) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Probability that a single edge survives sampling.
///
/// Any value in `[0, 1]` is accepted here; `p = 0` cuts every edge and
/// `p = 1` cuts none. Run configuration narrows this to the open interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64")]
pub struct Retention(f64);

impl TryFrom<f64> for Retention {
    type Error = LatticeError;

    fn try_from(p: f64) -> Result<Self> {
        Retention::new(p)
    }
}

impl Retention {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(LatticeError::InvalidProbability {
                value: p,
                expected: "[0, 1]",
            });
        }
        Ok(Self(p))
    }

    /// Open-interval constructor used for run configuration.
    pub fn strict(p: f64) -> Result<Self> {
        if !(p > 0.0 && p < 1.0) {
            return Err(LatticeError::InvalidProbability {
                value: p,
                expected: "(0, 1)",
            });
        }
        Ok(Self(p))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// An edge is cut when its uniform draw falls below this value.
    pub fn cut_threshold(&self) -> f64 {
        1.0 - self.0
    }
}

/// Ordered node indices joined by live edges, source first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<usize>,
}

impl Path {
    /// Callers guarantee `nodes` is non-empty and every hop is a live edge.
    pub fn from_nodes(nodes: Vec<usize>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn source(&self) -> usize {
        self.nodes[0]
    }

    pub fn target(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    /// Path length in edges.
    pub fn hop_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn into_nodes(self) -> Vec<usize> {
        self.nodes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathOutcome {
    Found { path: Path },
    Unreachable,
}

impl PathOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathOutcome::Found { path } => Some(path),
            PathOutcome::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, PathOutcome::Found { .. })
    }
}

/// Positions of one walker, one entry per step including the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    pub nodes: Vec<usize>,
}

impl Trajectory {
    pub fn start(&self) -> usize {
        self.nodes[0]
    }

    pub fn end(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOutcome {
    pub trajectories: Vec<Trajectory>,
    /// Start nodes excluded up front because they had no live neighbor.
    pub dropped: Vec<usize>,
}

/// Persisted form of an edge mask: cut edge indices in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskRecord {
    pub side: usize,
    pub edge_count: usize,
    pub cut_edges: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Node::new(1, 5);
        let b = Node::new(4, 2);
        assert_eq!(a.manhattan_distance(&b), 6);
        assert_eq!(b.manhattan_distance(&a), 6);
        assert_eq!(a.manhattan_distance(&a), 0);
    }

    #[test]
    fn retention_accepts_closed_interval() {
        assert!(Retention::new(0.0).is_ok());
        assert!(Retention::new(1.0).is_ok());
        assert!(Retention::new(-0.1).is_err());
        assert!(Retention::new(1.5).is_err());
        assert!(Retention::new(f64::NAN).is_err());
    }

    #[test]
    fn deserialized_retention_goes_through_the_range_check() {
        let p: Retention = serde_json::from_str("0.25").expect("in range");
        assert_eq!(p.value(), 0.25);
        assert!(serde_json::from_str::<Retention>("1.5").is_err());
        assert!(serde_json::from_str::<Retention>("-0.1").is_err());
    }

    #[test]
    fn strict_retention_rejects_endpoints() {
        assert!(Retention::strict(0.0).is_err());
        assert!(Retention::strict(1.0).is_err());
        assert!(Retention::strict(f64::NAN).is_err());
        let p = Retention::strict(0.55).expect("valid");
        assert!((p.cut_threshold() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn path_reports_endpoints_and_hops() {
        let path = Path::from_nodes(vec![3, 4, 11]);
        assert_eq!(path.source(), 3);
        assert_eq!(path.target(), 11);
        assert_eq!(path.hop_count(), 2);

        let single = Path::from_nodes(vec![7]);
        assert_eq!(single.hop_count(), 0);
        assert_eq!(single.source(), single.target());
    }

    #[test]
    fn unreachable_outcome_has_no_path() {
        assert!(PathOutcome::Unreachable.path().is_none());
        assert!(!PathOutcome::Unreachable.is_reachable());
        let found = PathOutcome::Found {
            path: Path::from_nodes(vec![0, 1]),
        };
        assert_eq!(found.path().map(Path::hop_count), Some(1));
    }
}
