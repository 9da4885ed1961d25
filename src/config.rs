//! Configuration for training and querying.
//!
//! Every path the recommender touches is passed in through
//! [`RecommenderConfig`]; nothing is read from implicit locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};
use crate::vectorizer::analyzer::StopWords;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data/products.csv";

/// Default model artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/cb_tfidf.cbor";

/// Default vocabulary cap.
pub const DEFAULT_MAX_TERMS: usize = 5000;

pub const DEFAULT_TOP_N: i64 = 5;

/// Query used for homepage recommendations.
pub const DEFAULT_FEATURED_QUERY: &str = "eco-friendly sustainable products";

pub const DEFAULT_FEATURED_TOP_N: i64 = 6;

/// Settings that shape the fitted vector space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Maximum number of distinct terms kept. `None` keeps all of them.
    pub max_terms: Option<usize>,
    pub stop_words: StopWords,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_terms: Some(DEFAULT_MAX_TERMS),
            stop_words: StopWords::default(),
        }
    }
}

impl ModelConfig {
    pub fn with_max_terms(max_terms: usize) -> Self {
        Self {
            max_terms: Some(max_terms),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_terms == Some(0) {
            return Err(RecommenderError::Config(
                "model.max_terms must be at least 1 (use null for no limit)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub catalog_path: PathBuf,
    pub model_path: PathBuf,
    pub model: ModelConfig,
    pub default_top_n: i64,
    pub featured_query: String,
    pub featured_top_n: i64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model: ModelConfig::default(),
            default_top_n: DEFAULT_TOP_N,
            featured_query: DEFAULT_FEATURED_QUERY.to_string(),
            featured_top_n: DEFAULT_FEATURED_TOP_N,
        }
    }
}

impl RecommenderConfig {
    /// Read a YAML config file. Missing keys fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RecommenderError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| RecommenderError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()
    }
}
