//! Bernoulli edge sampling with keyed caching.

use crate::domain::error::MaskStoreError;
use crate::domain::graph::{EdgeMask, GridGraph};
use crate::domain::model::{MaskRecord, Retention};
use crate::domain::traits::MaskStore;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSource {
    Loaded,
    Sampled,
}

impl MaskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskSource::Loaded => "loaded",
            MaskSource::Sampled => "sampled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampledMask {
    pub mask: EdgeMask,
    pub source: MaskSource,
    /// Set when a fresh mask could not be written back to the store.
    pub persist_error: Option<String>,
}

/// Draw one uniform value per edge, in edge-index order, and cut the edge
/// when the draw falls below `1 - p`.
pub fn sample_mask<R: Rng>(graph: &GridGraph, retention: Retention, rng: &mut R) -> EdgeMask {
    let threshold = retention.cut_threshold();
    let cut = (0..graph.edge_count())
        .map(|_| rng.gen::<f64>() < threshold)
        .collect();
    EdgeMask::from_flags(cut)
}

/// Return the mask cached under `key`, or sample and cache a fresh one.
///
/// Unreadable or mismatched records count as misses. A failed write is
/// reported in [`SampledMask::persist_error`] and the fresh mask is still
/// returned. On a hit the generator is advanced by the same number of draws a
/// fresh sample would take, so later consumers of `rng` do not depend on the
/// cache state.
pub fn load_or_sample<R: Rng>(
    store: &dyn MaskStore,
    key: &str,
    graph: &GridGraph,
    retention: Retention,
    rng: &mut R,
) -> SampledMask {
    match store.load(key) {
        Ok(Some(record)) => match mask_from_record(graph, &record) {
            Ok(mask) => {
                skip_draws(rng, graph.edge_count());
                info!(key = %key, cut = mask.cut_count(), "reusing cached edge mask");
                return SampledMask {
                    mask,
                    source: MaskSource::Loaded,
                    persist_error: None,
                };
            }
            Err(e) => warn!(key = %key, error = %e, "cached edge mask rejected; resampling"),
        },
        Ok(None) => debug!(key = %key, "no cached edge mask"),
        Err(e) => warn!(key = %key, error = %e, "cached edge mask unreadable; resampling"),
    }

    let mask = sample_mask(graph, retention, rng);
    let record = MaskRecord {
        side: graph.side(),
        edge_count: graph.edge_count(),
        cut_edges: mask.cut_indices(),
    };

    let persist_error = match store.save(key, &record) {
        Ok(()) => None,
        Err(e) => {
            warn!(key = %key, error = %e, "failed to cache edge mask");
            Some(e.to_string())
        }
    };

    SampledMask {
        mask,
        source: MaskSource::Sampled,
        persist_error,
    }
}

fn mask_from_record(graph: &GridGraph, record: &MaskRecord) -> Result<EdgeMask, MaskStoreError> {
    if record.side != graph.side() || record.edge_count != graph.edge_count() {
        return Err(MaskStoreError::Mismatch(format!(
            "record is for L={} with {} edges, lattice is L={} with {} edges",
            record.side,
            record.edge_count,
            graph.side(),
            graph.edge_count()
        )));
    }
    EdgeMask::from_indices(graph.edge_count(), record.cut_edges.iter().copied())
        .map_err(|e| MaskStoreError::Mismatch(e.to_string()))
}

fn skip_draws<R: Rng>(rng: &mut R, n: usize) {
    for _ in 0..n {
        let _: f64 = rng.gen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::json_mask_store::MemoryMaskStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct BrokenStore;

    impl MaskStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<MaskRecord>, MaskStoreError> {
            Err(MaskStoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk on fire",
            )))
        }

        fn save(&self, _key: &str, _record: &MaskRecord) -> Result<(), MaskStoreError> {
            Err(MaskStoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "read-only")))
        }
    }

    fn grid(side: usize) -> GridGraph {
        GridGraph::new(side).expect("grid")
    }

    #[test]
    fn same_seed_gives_same_mask() {
        let g = grid(10);
        let p = Retention::new(0.5).expect("p");
        let a = sample_mask(&g, p, &mut StdRng::seed_from_u64(7));
        let b = sample_mask(&g, p, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn extreme_retention_cuts_all_or_nothing() {
        let g = grid(6);
        let mut rng = StdRng::seed_from_u64(1);
        let keep_all = sample_mask(&g, Retention::new(1.0).expect("p"), &mut rng);
        assert_eq!(keep_all.cut_count(), 0);
        let cut_all = sample_mask(&g, Retention::new(0.0).expect("p"), &mut rng);
        assert_eq!(cut_all.cut_count(), g.edge_count());
    }

    #[test]
    fn cut_fraction_tracks_one_minus_p() {
        let g = grid(60);
        let p = Retention::new(0.7).expect("p");
        let mask = sample_mask(&g, p, &mut StdRng::seed_from_u64(3));
        let fraction = mask.cut_count() as f64 / g.edge_count() as f64;
        assert!((fraction - 0.3).abs() < 0.03, "cut fraction {fraction}");
    }

    #[test]
    fn cache_hit_returns_stored_mask_verbatim() {
        let g = grid(7);
        let store = MemoryMaskStore::new();
        let p = Retention::new(0.55).expect("p");

        let first = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(1));
        assert_eq!(first.source, MaskSource::Sampled);
        assert_eq!(store.len(), 1);

        // A different seed must not matter once the key is cached.
        let second = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(999));
        assert_eq!(second.source, MaskSource::Loaded);
        assert_eq!(second.mask, first.mask);
    }

    #[test]
    fn clearing_cache_and_resampling_reproduces_mask() {
        let g = grid(7);
        let store = MemoryMaskStore::new();
        let p = Retention::new(0.55).expect("p");

        let first = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(11));
        store.clear();
        let again = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(11));
        assert_eq!(again.source, MaskSource::Sampled);
        assert_eq!(again.mask, first.mask);
    }

    #[test]
    fn stream_position_is_independent_of_cache_state() {
        let g = grid(5);
        let store = MemoryMaskStore::new();
        let p = Retention::new(0.5).expect("p");

        let mut miss_rng = StdRng::seed_from_u64(5);
        load_or_sample(&store, "k", &g, p, &mut miss_rng);
        let mut hit_rng = StdRng::seed_from_u64(5);
        let hit = load_or_sample(&store, "k", &g, p, &mut hit_rng);
        assert_eq!(hit.source, MaskSource::Loaded);

        assert_eq!(miss_rng.gen::<u64>(), hit_rng.gen::<u64>());
    }

    #[test]
    fn mismatched_record_is_treated_as_miss() {
        let g = grid(4);
        let store = MemoryMaskStore::new();
        store
            .save(
                "k",
                &MaskRecord {
                    side: 5,
                    edge_count: 40,
                    cut_edges: vec![0],
                },
            )
            .expect("save");

        let p = Retention::new(0.5).expect("p");
        let out = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(2));
        assert_eq!(out.source, MaskSource::Sampled);
        assert_eq!(out.mask.edge_count(), g.edge_count());
    }

    #[test]
    fn out_of_range_record_is_treated_as_miss() {
        let g = grid(3);
        let store = MemoryMaskStore::new();
        store
            .save(
                "k",
                &MaskRecord {
                    side: 3,
                    edge_count: 12,
                    cut_edges: vec![12],
                },
            )
            .expect("save");

        let p = Retention::new(0.5).expect("p");
        let out = load_or_sample(&store, "k", &g, p, &mut StdRng::seed_from_u64(2));
        assert_eq!(out.source, MaskSource::Sampled);
    }

    #[test]
    fn broken_store_still_yields_fresh_mask() {
        let g = grid(4);
        let p = Retention::new(0.5).expect("p");
        let out = load_or_sample(&BrokenStore, "k", &g, p, &mut StdRng::seed_from_u64(8));
        assert_eq!(out.source, MaskSource::Sampled);
        assert!(out.persist_error.as_deref().is_some_and(|e| e.contains("read-only")));
        assert_eq!(out.mask, sample_mask(&g, p, &mut StdRng::seed_from_u64(8)));
    }
}
