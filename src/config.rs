//! Engine Configuration
//!
//! Settings for the engine and its collaborator adapters. Values come from
//! a JSON file, the environment (`SYNERGY_*`), or the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

use crate::composition::{ScorerSettings, MAX_CONCURRENT_NARRATIONS};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed RNG seed; `None` draws from entropy per request.
    pub seed: Option<u64>,
    pub max_candidates: usize,
    pub top_k: usize,
    pub alternative_sample: usize,
    pub narrator_timeout_ms: u64,
    /// Hops fetched around each player when building the synergy matrix.
    pub graph_depth: u32,
    /// Synergy for requested pairs with no co-play edge.
    pub default_pair_synergy: f64,
    pub log_json: bool,
    pub catalog_path: Option<PathBuf>,
    pub narrator: NarratorConfig,
    pub inference_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_candidates: 20,
            top_k: 5,
            alternative_sample: 10,
            narrator_timeout_ms: 10_000,
            graph_depth: 1,
            default_pair_synergy: 0.7,
            log_json: false,
            catalog_path: None,
            narrator: NarratorConfig::default(),
            inference_url: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `SYNERGY_*` environment variables. Unparseable
    /// values are reported rather than ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(seed) = read_var("SYNERGY_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(v) = read_var("SYNERGY_MAX_CANDIDATES")? {
            config.max_candidates = v;
        }
        if let Some(v) = read_var("SYNERGY_TOP_K")? {
            config.top_k = v;
        }
        if let Some(v) = read_var("SYNERGY_NARRATOR_TIMEOUT_MS")? {
            config.narrator_timeout_ms = v;
        }
        if let Some(v) = read_var("SYNERGY_GRAPH_DEPTH")? {
            config.graph_depth = v;
        }
        if let Some(v) = read_var("SYNERGY_LOG_JSON")? {
            config.log_json = v;
        }
        if let Ok(path) = env::var("SYNERGY_CATALOG_PATH") {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = env::var("SYNERGY_INFERENCE_URL") {
            config.inference_url = Some(url);
        }
        if let Ok(url) = env::var("SYNERGY_NARRATOR_URL") {
            config.narrator.base_url = url;
        }
        if let Ok(model) = env::var("SYNERGY_NARRATOR_MODEL") {
            config.narrator.model = model;
        }
        config.narrator.api_key = env::var("SYNERGY_NARRATOR_API_KEY")
            .ok()
            .filter(|k| valid_api_key(k));

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.top_k == 0 || self.top_k > MAX_CONCURRENT_NARRATIONS {
            return Err(EngineError::Config(format!(
                "top_k {} outside 1..={}",
                self.top_k, MAX_CONCURRENT_NARRATIONS
            )));
        }
        if self.max_candidates == 0 {
            return Err(EngineError::Config("max_candidates must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.default_pair_synergy) {
            return Err(EngineError::Config(format!(
                "default_pair_synergy {} outside [0, 1]",
                self.default_pair_synergy
            )));
        }
        Ok(())
    }

    pub fn scorer_settings(&self) -> ScorerSettings {
        ScorerSettings {
            max_candidates: self.max_candidates,
            top_k: self.top_k,
            alternative_sample: self.alternative_sample,
            narrator_timeout: Duration::from_millis(self.narrator_timeout_ms),
        }
    }
}

fn read_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", name, raw, e)),
        Err(_) => Ok(None),
    }
}

fn valid_api_key(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty() && !trimmed.contains("...")
}

/// Loads and saves [`EngineConfig`] as JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the config, writing the defaults first if the file is missing.
    pub async fn load(&self) -> Result<EngineConfig> {
        if !self.path.exists() {
            let default = EngineConfig::default();
            self.save(&default).await?;
            return Ok(default);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read config {}", self.path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config: &EngineConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}
