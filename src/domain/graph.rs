//! Square-lattice topology and the views derived from it.
//!
//! Node `(x, y)` has index `x + y * L`. Edges are numbered in a fixed order:
//! all horizontal edges row by row, then all vertical edges row by row, which
//! gives exactly `2 * L * (L - 1)` edges. The base graph is never mutated;
//! percolation is expressed as an [`EdgeMask`] layered on top of it through a
//! [`PrunedGraph`] view.

use crate::domain::error::{LatticeError, Result};
use crate::domain::model::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGraph {
    side: usize,
    edges: Vec<(usize, usize)>,
    // (neighbor, edge index), ascending by edge index.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl GridGraph {
    /// Build the 4-neighbour lattice of side `side`.
    pub fn new(side: usize) -> Result<Self> {
        let (node_count, edge_count) = Self::dimensions(side)?;
        let mut edges = Vec::with_capacity(edge_count);

        for y in 0..side {
            for x in 0..side - 1 {
                edges.push((x + y * side, x + 1 + y * side));
            }
        }
        for y in 0..side - 1 {
            for x in 0..side {
                edges.push((x + y * side, x + (y + 1) * side));
            }
        }

        let mut adjacency = vec![Vec::with_capacity(4); node_count];
        for (e, &(a, b)) in edges.iter().enumerate() {
            adjacency[a].push((b, e));
            adjacency[b].push((a, e));
        }

        Ok(Self {
            side,
            edges,
            adjacency,
        })
    }

    /// `(L², 2·L·(L-1))` for side `L`, checked before anything is allocated.
    pub fn dimensions(side: usize) -> Result<(usize, usize)> {
        if side < 2 {
            return Err(LatticeError::SideTooSmall(side));
        }
        let nodes = side.checked_mul(side);
        let edges = side
            .checked_mul(side - 1)
            .and_then(|n| n.checked_mul(2));
        match (nodes, edges) {
            (Some(nodes), Some(edges)) => Ok((nodes, edges)),
            _ => Err(LatticeError::SideTooLarge(side)),
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn node_count(&self) -> usize {
        self.side * self.side
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn check_node(&self, index: usize) -> Result<()> {
        if index >= self.node_count() {
            return Err(LatticeError::NodeOutOfRange {
                index,
                node_count: self.node_count(),
            });
        }
        Ok(())
    }

    pub fn check_edge(&self, index: usize) -> Result<()> {
        if index >= self.edge_count() {
            return Err(LatticeError::EdgeOutOfRange {
                index,
                edge_count: self.edge_count(),
            });
        }
        Ok(())
    }

    pub fn node_index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.side || y >= self.side {
            return Err(LatticeError::CoordinateOutOfRange {
                x,
                y,
                side: self.side,
            });
        }
        Ok(x + y * self.side)
    }

    pub fn node(&self, index: usize) -> Result<Node> {
        self.check_node(index)?;
        Ok(Node::new(index % self.side, index / self.side))
    }

    /// All sites, indexed by node index.
    pub fn nodes(&self) -> Vec<Node> {
        (0..self.node_count())
            .map(|i| Node::new(i % self.side, i / self.side))
            .collect()
    }

    /// All edges, indexed by edge index.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Result<(usize, usize)> {
        self.check_edge(index)?;
        Ok(self.edges[index])
    }

    pub fn edge_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, e)| e)
    }

    /// Degree in the unpruned lattice: 2 at corners, 3 on sides, 4 inside.
    pub fn degree(&self, index: usize) -> Result<usize> {
        self.check_node(index)?;
        Ok(self.adjacency[index].len())
    }

    pub fn manhattan_distance(&self, a: usize, b: usize) -> Result<usize> {
        Ok(self.node(a)?.manhattan_distance(&self.node(b)?))
    }

    /// View with every edge live.
    pub fn unpruned(&self) -> PrunedGraph<'_> {
        PrunedGraph {
            graph: self,
            mask: None,
        }
    }

    /// View restricted to the edges `mask` leaves live.
    pub fn prune<'a>(&'a self, mask: &'a EdgeMask) -> Result<PrunedGraph<'a>> {
        if mask.edge_count() != self.edge_count() {
            return Err(LatticeError::MaskMismatch {
                mask_edges: mask.edge_count(),
                graph_edges: self.edge_count(),
            });
        }
        Ok(self.masked_view(mask))
    }

    /// Unchecked variant of [`GridGraph::prune`] for masks already validated
    /// against this lattice.
    pub(crate) fn masked_view<'a>(&'a self, mask: &'a EdgeMask) -> PrunedGraph<'a> {
        debug_assert_eq!(mask.edge_count(), self.edge_count());
        PrunedGraph {
            graph: self,
            mask: Some(mask),
        }
    }
}

/// Set of cut edges over a lattice with a known edge count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    cut: Vec<bool>,
    cut_count: usize,
}

impl EdgeMask {
    /// No edge cut.
    pub fn empty(edge_count: usize) -> Self {
        Self {
            cut: vec![false; edge_count],
            cut_count: 0,
        }
    }

    /// Every edge cut.
    pub fn all(edge_count: usize) -> Self {
        Self {
            cut: vec![true; edge_count],
            cut_count: edge_count,
        }
    }

    /// Build a mask from cut edge indices, rejecting out-of-range or repeated ones.
    pub fn from_indices<I>(edge_count: usize, indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut cut = vec![false; edge_count];
        let mut cut_count = 0;
        for idx in indices {
            if idx >= edge_count {
                return Err(LatticeError::EdgeOutOfRange {
                    index: idx,
                    edge_count,
                });
            }
            if cut[idx] {
                return Err(LatticeError::DuplicateEdge(idx));
            }
            cut[idx] = true;
            cut_count += 1;
        }
        Ok(Self { cut, cut_count })
    }

    pub(crate) fn from_flags(cut: Vec<bool>) -> Self {
        let cut_count = cut.iter().filter(|&&c| c).count();
        Self { cut, cut_count }
    }

    pub fn edge_count(&self) -> usize {
        self.cut.len()
    }

    pub fn cut_count(&self) -> usize {
        self.cut_count
    }

    pub fn is_cut(&self, edge: usize) -> bool {
        self.cut.get(edge).copied().unwrap_or(false)
    }

    /// Cut edge indices in ascending order.
    pub fn cut_indices(&self) -> Vec<usize> {
        self.cut
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Read-only view of a [`GridGraph`] with an optional mask applied.
#[derive(Debug, Clone, Copy)]
pub struct PrunedGraph<'a> {
    graph: &'a GridGraph,
    mask: Option<&'a EdgeMask>,
}

impl<'a> PrunedGraph<'a> {
    pub fn graph(&self) -> &'a GridGraph {
        self.graph
    }

    pub fn mask(&self) -> Option<&'a EdgeMask> {
        self.mask
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn check_node(&self, index: usize) -> Result<()> {
        self.graph.check_node(index)
    }

    pub fn is_live(&self, edge: usize) -> bool {
        edge < self.graph.edge_count() && !self.mask.is_some_and(|m| m.is_cut(edge))
    }

    pub fn live_edge_count(&self) -> usize {
        self.graph.edge_count() - self.mask.map_or(0, EdgeMask::cut_count)
    }

    /// Live `(neighbor, edge)` pairs of `node`, ascending by edge index.
    ///
    /// Panics if `node` is out of range; callers validate first.
    pub fn live_edges(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + 'a {
        let graph: &'a GridGraph = self.graph;
        let mask = self.mask;
        graph.adjacency[node]
            .iter()
            .copied()
            .filter(move |&(_, e)| !mask.is_some_and(|m| m.is_cut(e)))
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + 'a {
        self.live_edges(node).map(|(n, _)| n)
    }

    pub fn degree(&self, node: usize) -> usize {
        self.live_edges(node).count()
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.graph
            .edge_between(a, b)
            .is_some_and(|e| self.is_live(e))
    }
}

/// Disjoint, exhaustive grouping of nodes into connected components.
///
/// Members of each component are ascending, and components are ordered by
/// their smallest member. The giant component is the first component of
/// maximum size in that order, i.e. ties go to the block holding the lowest
/// node index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPartition {
    component_of: Vec<usize>,
    components: Vec<Vec<usize>>,
    giant: usize,
}

impl ComponentPartition {
    /// Normalize arbitrary blocks into canonical order.
    ///
    /// Callers guarantee the blocks are non-empty, disjoint and cover
    /// `0..node_count`.
    pub fn from_components(node_count: usize, mut components: Vec<Vec<usize>>) -> Self {
        for comp in components.iter_mut() {
            comp.sort_unstable();
        }
        components.sort_unstable_by_key(|c| c[0]);

        let mut component_of = vec![usize::MAX; node_count];
        for (cid, comp) in components.iter().enumerate() {
            for &n in comp {
                component_of[n] = cid;
            }
        }

        let mut giant = 0;
        for (cid, comp) in components.iter().enumerate() {
            if comp.len() > components[giant].len() {
                giant = cid;
            }
        }

        Self {
            component_of,
            components,
            giant,
        }
    }

    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component_of(&self, node: usize) -> Option<usize> {
        self.component_of.get(node).copied()
    }

    pub fn same_component(&self, a: usize, b: usize) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    pub fn giant_index(&self) -> usize {
        self.giant
    }

    pub fn giant(&self) -> &[usize] {
        &self.components[self.giant]
    }

    /// Component sizes in component order.
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }
}
