pub mod catalog;
pub mod dex;
pub mod error;
pub mod model;
pub mod parallel;
pub mod rating;
pub mod report;
pub mod search;
pub mod suggest;
pub mod team;
pub mod telemetry;
pub mod types;

pub use crate::catalog::Catalog;
pub use crate::dex::{DataProvider, Dex, NameKind};
pub use crate::error::{Error, Result};
pub use crate::search::{score_combinations, score_combinations_with, CancelToken, SearchOptions};
pub use crate::suggest::suggest;
pub use crate::team::{score_team, ScoredTeam};

use crate::model::DexFile;
use crate::parallel::WorkerPool;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rate {
        name: String,
    },
    Team {
        names: Vec<String>,
    },
    Rank {
        generations: Vec<u8>,
        final_only: bool,
    },
    /// An empty `pool` means every final-stage species up to `max_generation`.
    Search {
        pool: Vec<String>,
        size: usize,
        cutoff: i32,
        max_generation: u8,
        output: Option<PathBuf>,
    },
    Suggest {
        names: Vec<String>,
        max_generation: u8,
    },
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub dex_path: PathBuf,
    pub json: bool,
    pub threads: usize,
    pub batch_size: u64,
    pub command: Command,
}

pub fn load_dex(path: &Path) -> anyhow::Result<Dex> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dex file at {}", path.display()))?;
    let parsed: DexFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    let dex = Dex::from_file(parsed)
        .with_context(|| format!("Invalid dex data in {}", path.display()))?;
    Ok(dex)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let dex = load_dex(path)?;
    Catalog::build(&dex).with_context(|| format!("Failed to rate species from {}", path.display()))
}

/// Prints `value` as JSON under `--json`, otherwise the text rendering.
fn emit<T, F>(opts: &CliOptions, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce() -> anyhow::Result<String>,
{
    if opts.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text()?);
    }
    Ok(())
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let catalog = load_catalog(&opts.dex_path)?;
    match &opts.command {
        Command::Rate { name } => {
            let id = catalog.id_of(name)?;
            let entry = catalog.entry(id)?;
            emit(&opts, &entry.rating, || {
                Ok(report::format_team_table(&catalog, &[id])?
                    + &format!("rating {}\n", entry.rating.rating))
            })?;
        }
        Command::Team { names } => {
            let ids = catalog.resolve_team(names)?;
            let scored = score_team(&catalog, &ids)?;
            emit(&opts, &scored, || {
                Ok(report::format_team_table(&catalog, &ids)?
                    + &format!(
                        "min {} x{}, total {}\n",
                        scored.min_total, scored.min_count, scored.full_total
                    ))
            })?;
        }
        Command::Rank {
            generations,
            final_only,
        } => {
            let ranked = catalog.rank(generations, *final_only);
            emit(&opts, &ranked, || Ok(report::format_ranked(&ranked)))?;
        }
        Command::Search {
            pool,
            size,
            cutoff,
            max_generation,
            output,
        } => {
            let pool = if pool.is_empty() {
                catalog.final_stage(*max_generation)
            } else {
                catalog.resolve_team(pool)?
            };
            let options = SearchOptions {
                batch_size: opts.batch_size,
                workers: WorkerPool::with_workers(opts.threads),
                cancel: None,
            };
            let last_percent = AtomicU64::new(0);
            let results =
                score_combinations_with(&catalog, &pool, *size, *cutoff, &options, |done, total| {
                    let percent = done * 100 / total.max(1);
                    if percent / 10 > last_percent.fetch_max(percent, Ordering::Relaxed) / 10 {
                        tracing::info!(done, total, "{percent}% of combinations scored");
                    }
                })?;
            if let Some(path) = output {
                report::write_csv(&catalog, &results, path)?;
                println!("Wrote {} teams to {}", results.len(), path.display());
            } else {
                emit(&opts, &results, || {
                    Ok(report::format_search_results(&catalog, &results)?)
                })?;
            }
        }
        Command::Suggest {
            names,
            max_generation,
        } => {
            let suggestions = suggest(&catalog, names, *max_generation)?;
            emit(&opts, &suggestions, || {
                Ok(report::format_suggestions(&suggestions))
            })?;
        }
    }
    Ok(())
}
