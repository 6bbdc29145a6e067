//! Construction-time parameters for one simulation run.

use crate::domain::error::LatticeError;
use crate::domain::graph::GridGraph;
use crate::domain::model::Retention;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration (TOML).
///
/// Missing fields take the defaults below. CLI flags are applied on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Lattice side length `L`.
    pub size: usize,

    /// Edge retention probability `p`.
    pub retention: f64,

    /// Seed for the single random stream; drawn from entropy when absent.
    pub seed: Option<u64>,

    pub cache_dir: PathBuf,

    /// Cache key for the sampled mask; derived from `size` and `retention` when absent.
    pub cache_key: Option<String>,

    pub source: Option<usize>,
    pub target: Option<usize>,

    /// Number of walkers started at uniformly random nodes.
    pub walkers: usize,

    /// Walkers started at fixed nodes, before the random ones.
    pub starts: Vec<usize>,

    pub steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size: 7,
            retention: 0.55,
            seed: None,
            cache_dir: PathBuf::from(".percolation-cache"),
            cache_key: None,
            source: None,
            target: None,
            walkers: 0,
            starts: Vec::new(),
            steps: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 7x7 lattice with a highlighted shortest path.
    Small,
    /// 15x15 lattice with ten random walkers.
    Big,
}

impl Preset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "small" => Some(Preset::Small),
            "big" => Some(Preset::Big),
            _ => None,
        }
    }
}

impl RunConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Small => Self {
                size: 7,
                retention: 0.55,
                cache_key: Some("indices_to_cut".to_string()),
                source: Some(13),
                target: Some(45),
                ..Self::default()
            },
            Preset::Big => Self {
                size: 15,
                retention: 0.525,
                cache_key: Some("indices_to_cut_BIG".to_string()),
                walkers: 10,
                steps: 100,
                ..Self::default()
            },
        }
    }

    pub fn retention(&self) -> Result<Retention, LatticeError> {
        Retention::strict(self.retention)
    }

    pub fn cache_key(&self) -> String {
        match &self.cache_key {
            Some(key) => key.clone(),
            None => format!("lattice_L{}_p{}", self.size, self.retention),
        }
    }

    /// `L²`, or an error when `size` is below 2 or overflows.
    pub fn node_count(&self) -> Result<usize, LatticeError> {
        GridGraph::dimensions(self.size).map(|(nodes, _)| nodes)
    }

    pub fn validate(&self) -> Result<()> {
        let node_count = self.node_count()?;
        self.retention()?;

        match (self.source, self.target) {
            (Some(s), Some(t)) => {
                check_node(s, node_count)?;
                check_node(t, node_count)?;
            }
            (None, None) => {}
            _ => return Err(anyhow!("source and target must be given together")),
        }

        for &s in &self.starts {
            check_node(s, node_count)?;
        }
        Ok(())
    }
}

fn check_node(index: usize, node_count: usize) -> Result<(), LatticeError> {
    if index >= node_count {
        return Err(LatticeError::NodeOutOfRange { index, node_count });
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RunConfig::default()`.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    if !path.exists() {
        return Ok(RunConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    let cfg: RunConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config: {}", path.display()))?;
    Ok(cfg)
}
