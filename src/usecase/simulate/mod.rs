pub mod report;
pub mod run;
pub mod sample;
pub mod walk;

use crate::domain::graph::GridGraph;
use crate::domain::traits::{ComponentAnalyzer, MaskStore, PathFinder};
use crate::usecase::config::RunConfig;
use crate::usecase::event::AppEvent;
use crate::usecase::simulate::report::{PathReport, SimulationReport, WalkReport};
use crate::usecase::simulate::run::PercolationRun;
use crate::usecase::simulate::sample::{load_or_sample, MaskSource};
use crate::usecase::stats::RunStats;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::info;

/// Build the lattice, percolate it, and run the requested path and walk
/// queries against the result.
///
/// All randomness comes from one generator seeded from `config.seed` (or from
/// entropy, recorded in the report). Draw order is fixed: one draw per edge for
/// the mask, then random walker origins, then walk steps.
pub async fn run_simulation(
    config: &RunConfig,
    store: &dyn MaskStore,
    analyzer: &dyn ComponentAnalyzer,
    finder: &dyn PathFinder,
    sink: Option<mpsc::Sender<AppEvent>>,
) -> Result<(SimulationReport, RunStats)> {
    config.validate()?;
    let retention = config.retention()?;
    let key = config.cache_key();

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "no seed configured; drew one from entropy");
            seed
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = RunStats::default();

    emit(&sink, AppEvent::PhaseStarted { name: "build_lattice".into() }).await;
    let graph = GridGraph::new(config.size).context("building lattice")?;
    stats.nodes = graph.node_count();
    stats.edges = graph.edge_count();
    emit(&sink, AppEvent::PhaseFinished { name: "build_lattice".into() }).await;

    emit(&sink, AppEvent::PhaseStarted { name: "percolate".into() }).await;
    let sampled = load_or_sample(store, &key, &graph, retention, &mut rng);
    stats.cut_edges = sampled.mask.cut_count();
    match sampled.source {
        MaskSource::Loaded => {
            emit(
                &sink,
                AppEvent::MaskLoaded {
                    key: key.clone(),
                    cut_edges: stats.cut_edges,
                },
            )
            .await
        }
        MaskSource::Sampled => {
            emit(
                &sink,
                AppEvent::MaskSampled {
                    key: key.clone(),
                    edges: stats.edges,
                    cut_edges: stats.cut_edges,
                },
            )
            .await
        }
    }
    if let Some(error) = sampled.persist_error.clone() {
        emit(
            &sink,
            AppEvent::MaskPersistFailed {
                key: key.clone(),
                error,
            },
        )
        .await;
    }
    emit(&sink, AppEvent::PhaseFinished { name: "percolate".into() }).await;

    emit(&sink, AppEvent::PhaseStarted { name: "components".into() }).await;
    let run = PercolationRun::new(graph, sampled.mask, analyzer).context("pruning lattice")?;
    stats.components = run.components().len();
    stats.giant_size = run.giant_component().len();
    stats.isolated_nodes = run.components().iter().filter(|c| c.len() == 1).count();
    emit(
        &sink,
        AppEvent::ComponentsComputed {
            nodes: stats.nodes,
            live_edges: run.view().live_edge_count(),
            components: stats.components,
            giant_size: stats.giant_size,
            isolated_nodes: stats.isolated_nodes,
        },
    )
    .await;
    emit(&sink, AppEvent::PhaseFinished { name: "components".into() }).await;

    let mut report =
        SimulationReport::from_run(&run, retention.value(), seed, key, sampled.source);

    if let (Some(source), Some(target)) = (config.source, config.target) {
        emit(&sink, AppEvent::PhaseStarted { name: "shortest_path".into() }).await;
        let outcome = run
            .shortest_path(finder, source, target)
            .context("computing shortest path")?;
        stats.path_hops = outcome.path().map(|p| p.hop_count());
        emit(
            &sink,
            AppEvent::PathComputed {
                source,
                target,
                hops: stats.path_hops,
            },
        )
        .await;
        report.path = Some(PathReport {
            source,
            target,
            outcome,
        });
        emit(&sink, AppEvent::PhaseFinished { name: "shortest_path".into() }).await;
    }

    if !config.starts.is_empty() || config.walkers > 0 {
        emit(&sink, AppEvent::PhaseStarted { name: "random_walk".into() }).await;
        let mut starts = config.starts.clone();
        starts.extend(walk::random_origins(run.graph(), config.walkers, &mut rng));

        let outcome = run
            .walk_trajectories_with(&starts, config.steps, &mut rng)
            .context("simulating walks")?;
        if !outcome.dropped.is_empty() {
            emit(
                &sink,
                AppEvent::WalkersDropped {
                    starts: outcome.dropped.clone(),
                },
            )
            .await;
        }
        stats.walkers = outcome.trajectories.len();
        stats.dropped_walkers = outcome.dropped.len();
        stats.steps = config.steps;
        emit(
            &sink,
            AppEvent::WalksSimulated {
                walkers: stats.walkers,
                steps: stats.steps,
            },
        )
        .await;
        report.walks = Some(WalkReport {
            steps: config.steps,
            starts,
            trajectories: outcome.trajectories,
            dropped: outcome.dropped,
        });
        emit(&sink, AppEvent::PhaseFinished { name: "random_walk".into() }).await;
    }

    report.stats = stats.clone();
    emit(
        &sink,
        AppEvent::Finished {
            stats: stats.clone(),
        },
    )
    .await;
    Ok((report, stats))
}

async fn emit(sink: &Option<mpsc::Sender<AppEvent>>, ev: AppEvent) {
    if let Some(tx) = sink {
        let _ = tx.send(ev).await;
    }
}
