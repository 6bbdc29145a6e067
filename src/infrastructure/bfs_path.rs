use crate::domain::error::Result;
use crate::domain::graph::PrunedGraph;
use crate::domain::model::{Path, PathOutcome};
use crate::domain::traits::PathFinder;
use std::collections::VecDeque;

const UNREACHED: usize = usize::MAX;

pub struct BfsPathFinder;

impl PathFinder for BfsPathFinder {
    fn shortest_path(
        &self,
        view: &PrunedGraph<'_>,
        source: usize,
        target: usize,
    ) -> Result<PathOutcome> {
        bfs_shortest_path(view, source, target)
    }
}

fn bfs_shortest_path(view: &PrunedGraph<'_>, source: usize, target: usize) -> Result<PathOutcome> {
    view.check_node(source)?;
    view.check_node(target)?;

    if source == target {
        return Ok(PathOutcome::Found {
            path: Path::from_nodes(vec![source]),
        });
    }

    // Predecessor recorded on first discovery; that fixes a shortest route.
    let mut pred = vec![UNREACHED; view.node_count()];
    pred[source] = source;
    let mut queue = VecDeque::from([source]);

    'search: while let Some(v) = queue.pop_front() {
        for w in view.neighbors(v) {
            if pred[w] != UNREACHED {
                continue;
            }
            pred[w] = v;
            if w == target {
                break 'search;
            }
            queue.push_back(w);
        }
    }

    if pred[target] == UNREACHED {
        return Ok(PathOutcome::Unreachable);
    }

    let mut nodes = vec![target];
    let mut cur = target;
    while cur != source {
        cur = pred[cur];
        nodes.push(cur);
    }
    nodes.reverse();

    Ok(PathOutcome::Found {
        path: Path::from_nodes(nodes),
    })
}

/// Every shortest path from `source` to `target`, in lexicographic order of
/// node sequences, stopping after `limit` paths.
///
/// The count grows combinatorially with distance on open lattices, so callers
/// should keep `limit` small. Disconnected endpoints give an empty list.
pub fn all_shortest_paths(
    view: &PrunedGraph<'_>,
    source: usize,
    target: usize,
    limit: usize,
) -> Result<Vec<Path>> {
    view.check_node(source)?;
    view.check_node(target)?;

    if limit == 0 {
        return Ok(Vec::new());
    }
    if source == target {
        return Ok(vec![Path::from_nodes(vec![source])]);
    }

    let from_source = bfs_distances(view, source)?;
    if from_source[target] == UNREACHED {
        return Ok(Vec::new());
    }
    let to_target = bfs_distances(view, target)?;

    let successors = |v: usize| -> Vec<usize> {
        let mut next: Vec<usize> = view
            .neighbors(v)
            .filter(|&w| {
                from_source[w] == from_source[v] + 1 && to_target[w] + 1 == to_target[v]
            })
            .collect();
        next.sort_unstable();
        next
    };

    // Iterative DFS over the shortest-path DAG.
    let mut out = Vec::new();
    let mut path = vec![source];
    let mut stack: Vec<(Vec<usize>, usize)> = vec![(successors(source), 0)];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        if frame.1 == frame.0.len() {
            stack.pop();
            path.pop();
            continue;
        }
        let next = frame.0[frame.1];
        frame.1 += 1;

        path.push(next);
        if next == target {
            out.push(Path::from_nodes(path.clone()));
            if out.len() == limit {
                break;
            }
            path.pop();
            continue;
        }
        stack.push((successors(next), 0));
    }

    Ok(out)
}

/// Hop distance from `start` to every node; unreachable nodes hold `usize::MAX`.
pub fn bfs_distances(view: &PrunedGraph<'_>, start: usize) -> Result<Vec<usize>> {
    view.check_node(start)?;
    let mut dist = vec![UNREACHED; view.node_count()];
    dist[start] = 0;
    let mut queue = VecDeque::from([start]);

    while let Some(v) = queue.pop_front() {
        for w in view.neighbors(v) {
            if dist[w] == UNREACHED {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
        }
    }
    Ok(dist)
}
