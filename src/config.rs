use crate::canon::{Cutoff, ScorerKind, DEFAULT_CUTOFF, DEFAULT_SUFFIX_STOPWORDS};
use crate::error::{CanonError, Result};
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_CUTOFF: &str = "REEL_CANON_CUTOFF";
pub const ENV_PARALLEL: &str = "REEL_CANON_PARALLEL";

/// Settings for the canonicalization engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonConfig {
    /// Similarity threshold (0-100) shared by matching and clustering
    pub cutoff: i64,
    /// Corporate suffixes stripped during normalization
    pub suffix_stopwords: Vec<String>,
    pub scorer: ScorerKind,
    /// Keep only the best N candidates per query; `None` keeps all
    pub match_limit: Option<usize>,
    /// Label written for null or empty values
    pub missing_label: String,
    /// Resolve distinct values on the rayon thread pool
    pub parallel: bool,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF as i64,
            suffix_stopwords: DEFAULT_SUFFIX_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            scorer: ScorerKind::default(),
            match_limit: None,
            missing_label: "nr".to_string(),
            parallel: false,
        }
    }
}

impl CanonConfig {
    pub fn validate(&self) -> Result<()> {
        Cutoff::new(self.cutoff)?;

        if self.missing_label.trim().is_empty() {
            return Err(CanonError::InvalidConfiguration(
                "missing_label must not be empty".to_string(),
            ));
        }
        if self.match_limit == Some(0) {
            return Err(CanonError::InvalidConfiguration(
                "match_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canon: CanonConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply `REEL_CANON_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(ENV_CUTOFF).ok().as_deref(),
            std::env::var(ENV_PARALLEL).ok().as_deref(),
        )
    }

    fn apply_overrides(&mut self, cutoff: Option<&str>, parallel: Option<&str>) -> Result<()> {
        if let Some(raw) = cutoff {
            self.canon.cutoff = raw.trim().parse().map_err(|_| {
                CanonError::InvalidConfiguration(format!("{} is not an integer: {}", ENV_CUTOFF, raw))
            })?;
        }
        if let Some(raw) = parallel {
            self.canon.parallel = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(CanonError::InvalidConfiguration(format!(
                        "{} is not a boolean: {}",
                        ENV_PARALLEL, raw
                    )))
                }
            };
        }
        Ok(())
    }
}
