use crate::domain::graph::{EdgeMask, GridGraph};
use crate::domain::model::PathOutcome;
use crate::domain::traits::ComponentAnalyzer;
use crate::infrastructure::bfs_path::bfs_distances;
use crate::infrastructure::schema_validator::validate_simulation_report;
use crate::usecase::simulate::report::SimulationReport;
use anyhow::{anyhow, Context, Result};

/// Check a report against its JSON schema and against the lattice it claims
/// to describe.
pub fn validate_report(report: &SimulationReport, analyzer: &dyn ComponentAnalyzer) -> Result<()> {
    let value = serde_json::to_value(report)?;
    validate_simulation_report(&value)?;

    let graph = GridGraph::new(report.side).context("rebuilding lattice")?;

    if report.nodes != graph.nodes() {
        return Err(anyhow!("node coordinates do not match a lattice of side {}", report.side));
    }
    if report.edges.as_slice() != graph.edges() {
        return Err(anyhow!("edge list does not match a lattice of side {}", report.side));
    }

    let mask = EdgeMask::from_indices(graph.edge_count(), report.cut_edges.iter().copied())
        .context("checking cut edges")?;
    let view = graph.prune(&mask)?;

    // Exhaustive and disjoint.
    let mut owner: Vec<Option<usize>> = vec![None; graph.node_count()];
    for (c, component) in report.components.iter().enumerate() {
        for &node in component {
            graph.check_node(node).with_context(|| format!("component {c}"))?;
            if let Some(first) = owner[node] {
                return Err(anyhow!("node {node} appears in components {first} and {c}"));
            }
            owner[node] = Some(c);
        }
    }
    if let Some(missing) = owner.iter().position(|o| o.is_none()) {
        return Err(anyhow!("node {missing} belongs to no component"));
    }

    let expected = analyzer.compute_components(&view);
    if report.components.as_slice() != expected.components() {
        return Err(anyhow!("components do not match the live edges"));
    }
    if report.giant_component != expected.giant_index() {
        return Err(anyhow!(
            "giant component is {} but the first largest block is {}",
            report.giant_component,
            expected.giant_index()
        ));
    }

    if let Some(path) = &report.path {
        graph.check_node(path.source).context("path source")?;
        graph.check_node(path.target).context("path target")?;
        match &path.outcome {
            PathOutcome::Found { path: p } => {
                if p.nodes().is_empty() || p.source() != path.source || p.target() != path.target {
                    return Err(anyhow!(
                        "path endpoints do not match {} -> {}",
                        path.source,
                        path.target
                    ));
                }
                for hop in p.nodes().windows(2) {
                    if !view.are_adjacent(hop[0], hop[1]) {
                        return Err(anyhow!(
                            "path hop {} -> {} is not a live edge",
                            hop[0],
                            hop[1]
                        ));
                    }
                }
                let shortest = bfs_distances(&view, path.source)?[path.target];
                if p.hop_count() != shortest {
                    return Err(anyhow!(
                        "path {} -> {} takes {} hops, shortest is {}",
                        path.source,
                        path.target,
                        p.hop_count(),
                        shortest
                    ));
                }
            }
            PathOutcome::Unreachable => {
                if expected.same_component(path.source, path.target) {
                    return Err(anyhow!(
                        "path {} -> {} marked unreachable but both lie in one component",
                        path.source,
                        path.target
                    ));
                }
            }
        }
    }

    if let Some(walks) = &report.walks {
        for &s in &walks.starts {
            graph.check_node(s).context("walk start")?;
        }
        let (walkers, isolated): (Vec<usize>, Vec<usize>) =
            walks.starts.iter().copied().partition(|&s| view.degree(s) > 0);
        if walks.dropped != isolated {
            return Err(anyhow!(
                "dropped walkers {:?} do not match the isolated starts {:?}",
                walks.dropped,
                isolated
            ));
        }
        let trajectory_starts: Vec<usize> = walks
            .trajectories
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.start())
            .collect();
        if walks.trajectories.len() != walkers.len() || trajectory_starts != walkers {
            return Err(anyhow!(
                "trajectories do not begin at the non-isolated starts {:?}",
                walkers
            ));
        }
        for (w, t) in walks.trajectories.iter().enumerate() {
            if t.len().checked_sub(1) != Some(walks.steps) {
                return Err(anyhow!(
                    "trajectory {w} has {} positions for {} steps",
                    t.len(),
                    walks.steps
                ));
            }
            for &node in &t.nodes {
                graph.check_node(node).with_context(|| format!("trajectory {w}"))?;
            }
            for hop in t.nodes.windows(2) {
                if !view.are_adjacent(hop[0], hop[1]) {
                    return Err(anyhow!(
                        "trajectory {w} hop {} -> {} is not a live edge",
                        hop[0],
                        hop[1]
                    ));
                }
            }
        }
    }

    Ok(())
}
