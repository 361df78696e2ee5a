//! Grading configuration and config-file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GradingError;

/// Heuristic knobs for the grading engine.
///
/// The defaults reproduce the reference grading behaviour exactly; changing
/// them changes every score, so persisted runs should be compared with
/// `GradingRun::compare` after tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Response length (in characters) that earns the full length score.
    pub target_length: usize,
    /// Weight of the length score in the combined score.
    pub length_weight: f64,
    /// Weight of the keyword-match score in the combined score.
    pub keyword_weight: f64,
    /// Responses longer than this are never scored zero.
    pub substantive_length: usize,
    /// Responses longer than this are praised for detail.
    pub detailed_length: usize,
    /// Responses shorter than this are asked for more detail.
    pub brief_length: usize,
    /// Keywords taken from the reference answer.
    pub reference_keyword_limit: usize,
    /// Keywords taken from each marking-scheme criterion description.
    pub criterion_keyword_limit: usize,
    /// Keywords taken from the question text when nothing else yields any.
    pub question_keyword_limit: usize,
    /// Shortest token kept by the keyword extractor.
    pub min_token_length: usize,
    /// Stopwords added to the built-in list.
    pub extra_stopwords: Vec<String>,
    /// Upper bound on suggested resources.
    pub max_resources: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            target_length: 500,
            length_weight: 0.3,
            keyword_weight: 0.7,
            substantive_length: 10,
            detailed_length: 300,
            brief_length: 200,
            reference_keyword_limit: 5,
            criterion_keyword_limit: 3,
            question_keyword_limit: 5,
            min_token_length: 4,
            extra_stopwords: Vec::new(),
            max_resources: 6,
        }
    }
}

impl GradingConfig {
    /// Check that the settings can produce consistent marks.
    pub fn validate(&self) -> Result<(), GradingError> {
        if self.target_length == 0 {
            return Err(GradingError::InvalidConfig(
                "target_length must be at least 1".into(),
            ));
        }
        if self.length_weight < 0.0 || self.keyword_weight < 0.0 {
            return Err(GradingError::InvalidConfig(
                "score weights must not be negative".into(),
            ));
        }
        let total = self.length_weight + self.keyword_weight;
        if (total - 1.0).abs() > 0.01 {
            return Err(GradingError::InvalidConfig(format!(
                "length_weight + keyword_weight must sum to 1.0, got {total}"
            )));
        }
        if self.max_resources < 3 {
            return Err(GradingError::InvalidConfig(
                "max_resources must be at least 3".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level gradewise configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// Grading heuristics.
    #[serde(default)]
    pub grading: GradingConfig,
    /// Max concurrent gradings in batch mode.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for batch runs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./gradewise-results")
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            grading: GradingConfig::default(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_PARALLELISM`, `GRADEWISE_OUTPUT_DIR`.
pub fn load_config() -> Result<GradewiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradewise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradewiseConfig::default(),
    };

    if let Ok(value) = std::env::var("GRADEWISE_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid GRADEWISE_PARALLELISM: '{value}'"))?;
    }
    if let Ok(dir) = std::env::var("GRADEWISE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    config.grading.validate()?;

    Ok(config)
}

/// Parse a config file body without touching the environment.
pub fn parse_config_str(content: &str) -> Result<GradewiseConfig> {
    Ok(toml::from_str::<GradewiseConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradewise"))
}
