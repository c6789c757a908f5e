//! Dataset generation CLI.
//!
//! Reads a renju.net XML database export and writes a policy/value
//! training dataset as flat binary files.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --source FILE     Path of the XML database export
//!   --config FILE     JSON config file applied before other flags
//!   --history N       History depth, even (default: 8)
//!   --augmented       Expand games into their symmetry variants
//!   --rulesets LIST   Comma-separated ruleset ids, or "all" (default: all)
//!   --exclude LIST    Comma-separated ruleset ids to remove
//!   --train-split F   Train fraction in (0, 1) (default: 0.8)
//!   --output DIR      Output root directory (default: GeneratedDatasets)
//!   --seed N          Shuffle seed, 0 for entropy (default: 0)
//!   --quiet           Suppress progress output

use std::env;
use std::path::{Path, PathBuf};

use renjugen::config::GenerationConfig;
use renjugen::pipeline;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = GenerationConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--source" => {
                i += 1;
                config.source = PathBuf::from(&args[i]);
            }
            "--config" => {
                i += 1;
                config = match GenerationConfig::from_json_file(Path::new(&args[i])) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }
                };
            }
            "--history" => {
                i += 1;
                config.history_depth = args[i].parse().expect("invalid --history value");
            }
            "--augmented" => {
                config.augmented = true;
            }
            "--rulesets" => {
                i += 1;
                config.ruleset_whitelist = if args[i] == "all" {
                    None
                } else {
                    Some(parse_id_list(&args[i]))
                };
            }
            "--exclude" => {
                i += 1;
                config.ruleset_blacklist = parse_id_list(&args[i]);
            }
            "--train-split" => {
                i += 1;
                config.train_split = args[i].parse().expect("invalid --train-split value");
            }
            "--output" => {
                i += 1;
                config.output_root = PathBuf::from(&args[i]);
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    match pipeline::run(&config) {
        Ok(summary) => {
            if !config.quiet {
                eprintln!(
                    "Done: {} games in, {} unique positions out ({} train | {} test)",
                    summary.games_extracted,
                    summary.unique_positions,
                    summary.dataset.train,
                    summary.dataset.test
                );
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn parse_id_list(list: &str) -> Vec<u32> {
    list.split(',')
        .map(|id| id.trim().parse().expect("invalid ruleset id"))
        .collect()
}

fn print_usage() {
    eprintln!("Usage: renjugen [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --source FILE     Path of the XML database export");
    eprintln!("  --config FILE     JSON config file applied before other flags");
    eprintln!("  --history N       History depth, even (default: 8)");
    eprintln!("  --augmented       Expand games into their symmetry variants");
    eprintln!("  --rulesets LIST   Comma-separated ruleset ids, or \"all\" (default: all)");
    eprintln!("  --exclude LIST    Comma-separated ruleset ids to remove");
    eprintln!("  --train-split F   Train fraction in (0, 1) (default: 0.8)");
    eprintln!("  --output DIR      Output root directory (default: GeneratedDatasets)");
    eprintln!("  --seed N          Shuffle seed, 0 for entropy (default: 0)");
    eprintln!("  --quiet           Suppress progress output");
    eprintln!("  --help            Show this help");
}
