//! End-to-end dataset generation.
//!
//! Wires the pipeline stages behind one entry point: read and scan the
//! source, extract and filter games, optionally augment, aggregate every
//! ply boundary, reduce to canonical entries, then shuffle/split/write.
//!
//! Error policy per stage: configuration and source-level problems are
//! fatal; a game that fails extraction is skipped and counted, never
//! aborting the corpus scan. The whole corpus and the aggregation table
//! are held in memory for the duration of the run.

use std::fs;
use std::path::PathBuf;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::aggregate::{accumulate_game, PositionTable};
use crate::config::{ConfigError, GenerationConfig};
use crate::dataset::{write_dataset, DatasetSummary};
use crate::record::GameRecord;
use crate::source::{extract_game, scan_games, SourceError};
use crate::symmetry::augment;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),
}

/// Counters reported after a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// `<game>` elements found in the source.
    pub games_scanned: usize,
    /// Games that parsed and matched the ruleset selection.
    pub games_extracted: usize,
    /// Games rejected by the extractor.
    pub games_skipped: usize,
    /// Games excluded by the ruleset filter.
    pub games_filtered: usize,
    /// Position observations, counting duplicates.
    pub observations: usize,
    /// Unique positions after deduplication.
    pub unique_positions: usize,
    /// Written partition sizes.
    pub dataset: DatasetSummary,
    /// Directory the dataset was written to.
    pub output_dir: PathBuf,
}

/// Runs one full generation pass.
pub fn run(config: &GenerationConfig) -> Result<RunSummary, PipelineError> {
    config.validate()?;
    let rulesets = config.resolve_rulesets()?;
    let output_dir = config.output_root.join(config.dataset_dir_name()?);

    if !config.quiet {
        eprintln!(
            "Generating dataset with HD={}, augmented={}, split={}, rulesets={:?}",
            config.history_depth, config.augmented, config.train_split, rulesets
        );
    }

    let xml = fs::read_to_string(&config.source)?;
    let raw_games = scan_games(&xml)?;
    let games_scanned = raw_games.len();

    let mut games: Vec<GameRecord> = Vec::new();
    let mut games_skipped = 0;
    let mut games_filtered = 0;
    for raw in &raw_games {
        match extract_game(raw) {
            Ok(game) if rulesets.contains(&game.ruleset) => games.push(game),
            Ok(_) => games_filtered += 1,
            Err(err) => {
                games_skipped += 1;
                if !config.quiet {
                    eprintln!("skipping game {}: {}", raw.id, err);
                }
            }
        }
    }
    let games_extracted = games.len();
    if !config.quiet {
        eprintln!(
            "Extracted {} games from {} ({} skipped, {} filtered)",
            games_extracted,
            config.source.display(),
            games_skipped,
            games_filtered
        );
    }

    if config.augmented {
        let mut expanded = Vec::with_capacity(games.len() * 6);
        for game in games {
            let variants = augment(&game);
            expanded.push(game);
            expanded.extend(variants);
        }
        games = expanded;
        if !config.quiet {
            eprintln!("Augmented dataset to {} games", games.len());
        }
    }

    let mut table = PositionTable::new();
    for game in &games {
        accumulate_game(&mut table, game, config.history_depth);
    }
    let observations = table.observations();
    let unique_positions = table.len();
    let entries = table.reduce();
    if !config.quiet {
        eprintln!("Generated {unique_positions} unique positions from {observations} observations");
    }

    let mut rng = if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed)
    } else {
        SmallRng::from_entropy()
    };
    let dataset = write_dataset(entries, &output_dir, config.train_split, &mut rng)?;
    if !config.quiet {
        eprintln!(
            "Wrote {} datapoints (train {} | test {}) to {}",
            dataset.total,
            dataset.train,
            dataset.test,
            output_dir.display()
        );
    }

    Ok(RunSummary {
        games_scanned,
        games_extracted,
        games_skipped,
        games_filtered,
        observations,
        unique_positions,
        dataset,
        output_dir,
    })
}
