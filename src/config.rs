//! Generation configuration.
//!
//! All knobs for one dataset-generation run live in a single value object,
//! built from CLI flags and/or a JSON file and passed by reference into the
//! pipeline. Validation happens up front: configuration problems are fatal
//! before any scanning or encoding work starts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Ruleset ids recognized by the source database.
pub const RULESET_IDS: std::ops::RangeInclusive<u32> = 1..=29;

/// Errors that abort a run before any work is done.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history depth must be even, got {0}")]
    OddHistoryDepth(usize),

    #[error("train split must lie strictly between 0 and 1, got {0}")]
    InvalidTrainSplit(f64),

    #[error("no rulesets selected after applying the blacklist")]
    EmptyRulesetSelection,

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for one dataset-generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Path of the renju.net XML database export.
    #[serde(default = "default_source")]
    pub source: PathBuf,
    /// Directory under which the dataset directory is created.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Number of newest plies with per-ply temporal resolution. Must be
    /// even; 0 encodes the turn plane only.
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Expand every game into its five symmetry variants.
    #[serde(default)]
    pub augmented: bool,
    /// Ruleset ids to include; absent means all of `RULESET_IDS`.
    #[serde(default)]
    pub ruleset_whitelist: Option<Vec<u32>>,
    /// Ruleset ids removed after the whitelist is applied.
    #[serde(default)]
    pub ruleset_blacklist: Vec<u32>,
    /// Fraction of entries assigned to the train partition.
    #[serde(default = "default_train_split")]
    pub train_split: f64,
    /// Shuffle seed; 0 means entropy.
    #[serde(default)]
    pub seed: u64,
    /// Suppress per-game skip diagnostics.
    #[serde(default)]
    pub quiet: bool,
}

fn default_source() -> PathBuf {
    PathBuf::from("renjunet_v10.xml")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("GeneratedDatasets")
}

fn default_history_depth() -> usize {
    8
}

fn default_train_split() -> f64 {
    0.8
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            source: default_source(),
            output_root: default_output_root(),
            history_depth: default_history_depth(),
            augmented: false,
            ruleset_whitelist: None,
            ruleset_blacklist: Vec::new(),
            train_split: default_train_split(),
            seed: 0,
            quiet: false,
        }
    }
}

impl GenerationConfig {
    /// Loads a configuration from a JSON file; absent fields keep their
    /// defaults.
    pub fn from_json_file(path: &Path) -> Result<GenerationConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks scalar fields. Called by the pipeline before any work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_depth % 2 != 0 {
            return Err(ConfigError::OddHistoryDepth(self.history_depth));
        }
        if !(self.train_split > 0.0 && self.train_split < 1.0) {
            return Err(ConfigError::InvalidTrainSplit(self.train_split));
        }
        Ok(())
    }

    /// Resolves the whitelist/blacklist pair into the effective ruleset
    /// selection. An empty selection is a configuration error.
    pub fn resolve_rulesets(&self) -> Result<Vec<u32>, ConfigError> {
        let mut selected: Vec<u32> = match &self.ruleset_whitelist {
            Some(ids) => ids.clone(),
            None => RULESET_IDS.collect(),
        };
        selected.retain(|id| !self.ruleset_blacklist.contains(id));
        if selected.is_empty() {
            return Err(ConfigError::EmptyRulesetSelection);
        }
        Ok(selected)
    }

    /// Directory name encoding the generation parameters, e.g.
    /// `HD8,AUG,TS0.8,RULESETS(1-6, 8-29)`. The consumer reconstructs
    /// tensor shapes from this name; the files themselves carry no header.
    pub fn dataset_dir_name(&self) -> Result<String, ConfigError> {
        let mut rulesets = self.resolve_rulesets()?;
        rulesets.sort_unstable();
        Ok(format!(
            "HD{},{}TS{},RULESETS({})",
            self.history_depth,
            if self.augmented { "AUG," } else { "" },
            self.train_split,
            format_ranges(&rulesets),
        ))
    }
}

/// Compresses a sorted id list into `a-b` ranges: `[1,2,3,5]` -> `1-3, 5`.
fn format_ranges(ids: &[u32]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut start = ids[0];
    let mut end = ids[0];
    for &id in &ids[1..] {
        if id == end + 1 {
            end = id;
        } else {
            ranges.push(range_str(start, end));
            start = id;
            end = id;
        }
    }
    ranges.push(range_str(start, end));
    ranges.join(", ")
}

fn range_str(start: u32, end: u32) -> String {
    if start == end {
        format!("{start}")
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = GenerationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.resolve_rulesets().unwrap().len(), 29);
    }

    #[test]
    fn odd_history_depth_is_rejected() {
        let config = GenerationConfig {
            history_depth: 7,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OddHistoryDepth(7))
        ));
    }

    #[test]
    fn split_bounds_are_exclusive() {
        for bad in [0.0, 1.0, -0.1, 1.5] {
            let config = GenerationConfig {
                train_split: bad,
                ..GenerationConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTrainSplit(_))
            ));
        }
        let config = GenerationConfig {
            train_split: 0.5,
            ..GenerationConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn blacklist_removes_from_whitelist() {
        let config = GenerationConfig {
            ruleset_whitelist: Some(vec![1, 2, 3]),
            ruleset_blacklist: vec![2],
            ..GenerationConfig::default()
        };
        assert_eq!(config.resolve_rulesets().unwrap(), vec![1, 3]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let config = GenerationConfig {
            ruleset_whitelist: Some(vec![7]),
            ruleset_blacklist: vec![7],
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.resolve_rulesets(),
            Err(ConfigError::EmptyRulesetSelection)
        ));
    }

    #[test]
    fn ranges_are_compressed() {
        assert_eq!(format_ranges(&[1]), "1");
        assert_eq!(format_ranges(&[1, 2, 3]), "1-3");
        assert_eq!(format_ranges(&[1, 2, 3, 5]), "1-3, 5");
        assert_eq!(format_ranges(&[2, 4, 5, 6, 9]), "2, 4-6, 9");
    }

    #[test]
    fn dataset_dir_name_encodes_parameters() {
        let config = GenerationConfig {
            history_depth: 8,
            augmented: true,
            ruleset_whitelist: Some(vec![1]),
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.dataset_dir_name().unwrap(),
            "HD8,AUG,TS0.8,RULESETS(1)"
        );

        let config = GenerationConfig {
            history_depth: 4,
            ruleset_blacklist: vec![7],
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.dataset_dir_name().unwrap(),
            "HD4,TS0.8,RULESETS(1-6, 8-29)"
        );
    }

    #[test]
    fn json_config_fills_missing_fields_with_defaults() {
        let parsed: GenerationConfig =
            serde_json::from_str(r#"{"history_depth": 4, "augmented": true}"#).unwrap();
        assert_eq!(parsed.history_depth, 4);
        assert!(parsed.augmented);
        assert_eq!(parsed.train_split, 0.8);
        assert_eq!(parsed.ruleset_whitelist, None);
        assert_eq!(parsed.seed, 0);
    }

    #[test]
    fn unknown_json_fields_are_rejected() {
        let parsed = serde_json::from_str::<GenerationConfig>(r#"{"histori_depth": 4}"#);
        assert!(parsed.is_err());
    }
}
