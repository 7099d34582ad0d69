//! Runtime configuration for the analyzer.
//!
//! Values come from (lowest to highest precedence) the defaults below, an
//! optional JSON file, then command line flags and environment variables
//! applied by the binary.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use sources::{
    CatalogConfig,
    FetcherConfig,
    BROWSER_USER_AGENT,
    DEFAULT_OMDB_BASE_URL,
    DEFAULT_REVIEW_BASE_URL,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL_DIR: &str = "models/sentiment";
pub const DEFAULT_VOCABULARY_PATH: &str = "models/imdb_word_index.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Directory holding `config.json` and `model.safetensors`
    pub model_dir: PathBuf,
    /// JSON word index (unshifted base ids)
    pub vocabulary_path: PathBuf,
    pub review_base_url: String,
    pub user_agent: String,
    /// Per-request timeout for every outbound HTTP call
    pub request_timeout_secs: u64,
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            vocabulary_path: PathBuf::from(DEFAULT_VOCABULARY_PATH),
            review_base_url: DEFAULT_REVIEW_BASE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            omdb_api_key: None,
            omdb_base_url: DEFAULT_OMDB_BASE_URL.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Read a config file; fields it omits keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| AnalysisError::Config {
            reason: format!("reading {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&raw).map_err(|e| AnalysisError::Config {
            reason: format!("parsing {}: {}", path.display(), e),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(AnalysisError::Config {
                reason: "request_timeout_secs must be positive".to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(AnalysisError::Config {
                reason: "user_agent must not be empty".to_string(),
            });
        }
        for (field, url) in [
            ("review_base_url", &self.review_base_url),
            ("omdb_base_url", &self.omdb_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AnalysisError::Config {
                    reason: format!("{} must be an http(s) URL, got '{}'", field, url),
                });
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default()
            .with_base_url(self.review_base_url.clone())
            .with_user_agent(self.user_agent.clone())
            .with_timeout(self.request_timeout())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.omdb_base_url.clone(),
            api_key: self.omdb_api_key.clone(),
            timeout: self.request_timeout(),
        }
    }
}
