use crate::domain::graph::{ComponentPartition, PrunedGraph};
use crate::domain::traits::ComponentAnalyzer;

pub struct UnionFindAnalyzer;

impl ComponentAnalyzer for UnionFindAnalyzer {
    fn compute_components(&self, view: &PrunedGraph<'_>) -> ComponentPartition {
        union_find_components(view)
    }
}

fn union_find_components(view: &PrunedGraph<'_>) -> ComponentPartition {
    let n = view.node_count();
    let mut sets = DisjointSets::new(n);

    for (e, &(a, b)) in view.graph().edges().iter().enumerate() {
        if view.is_live(e) {
            sets.union(a, b);
        }
    }

    // Nodes are visited in index order, so blocks come out ordered by their
    // smallest member with ascending members.
    let mut block_of_root = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for v in 0..n {
        let root = sets.find(v);
        if block_of_root[root] == usize::MAX {
            block_of_root[root] = components.len();
            components.push(Vec::new());
        }
        components[block_of_root[root]].push(v);
    }

    ComponentPartition::from_components(n, components)
}

struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, v: usize) -> usize {
        let mut root = v;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression.
        let mut cur = v;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}
