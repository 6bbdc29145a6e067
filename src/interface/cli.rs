use crate::infrastructure::bfs_path::BfsPathFinder;
use crate::infrastructure::event_ndjson::spawn_ndjson_printer;
use crate::infrastructure::json_mask_store::JsonFileMaskStore;
use crate::infrastructure::report_json_adapter::{read_report_file, write_report_file};
use crate::infrastructure::union_find::UnionFindAnalyzer;
use crate::usecase::config::{load_config, Preset, RunConfig};
use crate::usecase::event::AppEvent;
use crate::usecase::simulate::run_simulation;
use crate::usecase::validate::validate_report;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    run_with_args(&args).await
}

pub async fn run_with_args(args: &[String]) -> Result<()> {
    let cmd = Cli::parse(args)?;

    match cmd {
        Cli::PercolationRun(run_args) => {
            let config = run_args.resolve()?;

            let (tx, rx) = mpsc::channel::<AppEvent>(1024);
            let printer = if run_args.emit_events {
                Some(spawn_ndjson_printer(rx))
            } else {
                drop(rx);
                None
            };

            let store = JsonFileMaskStore::new(config.cache_dir.clone());
            let analyzer = UnionFindAnalyzer;
            let finder = BfsPathFinder;

            let (report, stats) =
                run_simulation(&config, &store, &analyzer, &finder, Some(tx)).await?;

            if let Some(out) = &run_args.out {
                write_report_file(out, &report)
                    .await
                    .with_context(|| format!("writing simulation report JSON: {out}"))?;
            }

            if let Some(handle) = printer {
                handle.await.ok();
            }

            let hops = stats
                .path_hops
                .map(|h| h.to_string())
                .unwrap_or_else(|| "none".to_string());
            eprintln!(
                "summary: seed={} mask={} nodes={} edges={} cut_edges={} components={} giant_size={} isolated_nodes={} path_hops={} walkers={} dropped_walkers={} steps={}",
                report.seed,
                report.mask_source.as_str(),
                stats.nodes,
                stats.edges,
                stats.cut_edges,
                stats.components,
                stats.giant_size,
                stats.isolated_nodes,
                hops,
                stats.walkers,
                stats.dropped_walkers,
                stats.steps
            );

            Ok(())
        }

        Cli::PercolationValidate { input } => {
            let report = read_report_file(&input)
                .await
                .with_context(|| format!("reading simulation report JSON: {input}"))?;

            validate_report(&report, &UnionFindAnalyzer)
                .with_context(|| format!("validating simulation report: {input}"))?;

            // Emit an explicit schema validation success message for e2e tests.
            eprintln!("schema validation passed");
            eprintln!("ok: invariants validated");
            Ok(())
        }
    }
}

#[derive(Debug)]
enum Cli {
    PercolationRun(RunArgs),
    PercolationValidate { input: String },
}

/// Flags of `percolation run`. Unset flags leave the base config untouched.
#[derive(Debug, Default)]
struct RunArgs {
    config: Option<PathBuf>,
    preset: Option<Preset>,
    size: Option<usize>,
    retention: Option<f64>,
    seed: Option<u64>,
    cache_dir: Option<PathBuf>,
    cache_key: Option<String>,
    source: Option<usize>,
    target: Option<usize>,
    walkers: Option<usize>,
    starts: Vec<usize>,
    steps: Option<usize>,
    out: Option<String>,
    emit_events: bool,
}

impl RunArgs {
    fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = match (&self.config, self.preset) {
            (Some(_), Some(_)) => {
                return Err(anyhow!(format!(
                    "--config and --preset are mutually exclusive\n\n{}",
                    usage()
                )))
            }
            (Some(path), None) => load_config(path)?,
            (None, Some(preset)) => RunConfig::preset(preset),
            (None, None) => RunConfig::default(),
        };

        if let Some(v) = self.size {
            cfg.size = v;
        }
        if let Some(v) = self.retention {
            cfg.retention = v;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(v) = &self.cache_dir {
            cfg.cache_dir = v.clone();
        }
        if self.cache_key.is_some() {
            cfg.cache_key = self.cache_key.clone();
        }
        if self.source.is_some() {
            cfg.source = self.source;
        }
        if self.target.is_some() {
            cfg.target = self.target;
        }
        if let Some(v) = self.walkers {
            cfg.walkers = v;
        }
        if !self.starts.is_empty() {
            cfg.starts = self.starts.clone();
        }
        if let Some(v) = self.steps {
            cfg.steps = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

impl Cli {
    fn parse(args: &[String]) -> Result<Self> {
        // Expected:
        // <bin> percolation run [--config <run.toml> | --preset small|big] [overrides...]
        //     [--out <report.json>] [--emit-events]
        // <bin> percolation validate --in/--input <report.json>
        if args.len() < 3 {
            return Err(anyhow!(usage()));
        }

        if args[1] != "percolation" {
            return Err(anyhow!(usage()));
        }

        match args[2].as_str() {
            "run" => Self::parse_run(args),
            "validate" => Self::parse_validate(args),
            _ => Err(anyhow!(usage())),
        }
    }

    fn parse_run(args: &[String]) -> Result<Self> {
        let mut run = RunArgs::default();

        let mut i = 3;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--config" => {
                    i += 1;
                    run.config = Some(PathBuf::from(value(args, i, flag)?));
                }
                "--preset" => {
                    i += 1;
                    let name = value(args, i, flag)?;
                    run.preset = Some(Preset::parse(name).ok_or_else(|| {
                        anyhow!(format!("unknown preset: {name}\n\n{}", usage()))
                    })?);
                }
                "--size" | "-L" => {
                    i += 1;
                    run.size = Some(parse_number(args, i, flag)?);
                }
                "--p" | "--retention" => {
                    i += 1;
                    run.retention = Some(parse_number(args, i, flag)?);
                }
                "--seed" => {
                    i += 1;
                    run.seed = Some(parse_number(args, i, flag)?);
                }
                "--cache-dir" => {
                    i += 1;
                    run.cache_dir = Some(PathBuf::from(value(args, i, flag)?));
                }
                "--cache-key" => {
                    i += 1;
                    run.cache_key = Some(value(args, i, flag)?.to_string());
                }
                "--source" => {
                    i += 1;
                    run.source = Some(parse_number(args, i, flag)?);
                }
                "--target" => {
                    i += 1;
                    run.target = Some(parse_number(args, i, flag)?);
                }
                "--walkers" => {
                    i += 1;
                    run.walkers = Some(parse_number(args, i, flag)?);
                }
                "--start" => {
                    i += 1;
                    run.starts.push(parse_number(args, i, flag)?);
                }
                "--steps" => {
                    i += 1;
                    run.steps = Some(parse_number(args, i, flag)?);
                }
                "--out" | "--output" => {
                    i += 1;
                    run.out = Some(value(args, i, flag)?.to_string());
                }
                "--emit-events" => {
                    run.emit_events = true;
                }
                "-h" | "--help" => return Err(anyhow!(usage())),
                other => return Err(anyhow!(format!("unknown arg: {other}\n\n{}", usage()))),
            }
            i += 1;
        }

        Ok(Cli::PercolationRun(run))
    }

    fn parse_validate(args: &[String]) -> Result<Self> {
        let mut input: Option<String> = None;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--in" | "--input" => {
                    i += 1;
                    input = args.get(i).cloned();
                }
                "-h" | "--help" => return Err(anyhow!(usage())),
                other => return Err(anyhow!(format!("unknown arg: {other}\n\n{}", usage()))),
            }
            i += 1;
        }

        let input = input.ok_or_else(|| anyhow!(format!("missing --in/--input\n\n{}", usage())))?;

        Ok(Cli::PercolationValidate { input })
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!(format!("missing value for {flag}\n\n{}", usage())))
}

fn parse_number<T>(args: &[String], i: usize, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value(args, i, flag)?;
    raw.parse::<T>()
        .map_err(|e| anyhow!("invalid value for {flag}: {raw} ({e})"))
}

fn usage() -> &'static str {
    "Usage:\n  percolation run [--config <run.toml> | --preset small|big] [--size <L>] [--p <retention>] [--seed <u64>]\n                  [--cache-dir <dir>] [--cache-key <key>] [--source <node> --target <node>]\n                  [--walkers <n>] [--start <node>]... [--steps <n>] [--out <report.json>] [--emit-events]\n  percolation validate --in/--input <report.json>\n\nEvents:\n  If --emit-events is set, NDJSON events are written to stdout; summary goes to stderr.\n\nCache:\n  Edge masks are cached as <cache-dir>/<cache-key>.json and reused verbatim on later runs."
}
