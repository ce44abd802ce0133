//! Narrators
//!
//! Rationale generation over an OpenAI-compatible chat endpoint, plus an
//! in-memory cache in front of any narrator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::Narrator;
use crate::composition::{MetaContext, ScoredComposition};
use crate::utils::truncate_text;

/// Responses longer than this are cut down before they reach a report.
const MAX_RATIONALE_BYTES: usize = 600;

const SYSTEM_PROMPT: &str = "You are a League of Legends analyst. Explain team compositions \
     in plain language, focusing on synergy and meta fit.";

fn build_prompt(composition: &ScoredComposition, meta: &MetaContext) -> Result<String> {
    let players = serde_json::to_string(&composition.candidate.players)?;
    let meta_json = serde_json::to_string(meta)?;
    Ok(format!(
        "Explain why this team composition is strong in the current meta:\n\n\
         Composition: {}\n\
         Predicted Win Rate: {:.3}\n\
         Meta Context: {}\n\n\
         Provide a concise 2-sentence explanation focusing on synergy and meta fit.",
        players, composition.predicted_win_rate, meta_json
    ))
}

pub struct LlmNarrator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmNarrator {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Narrator for LlmNarrator {
    async fn explain(&self, composition: &ScoredComposition, meta: &MetaContext) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(composition, meta)? },
            ],
            "max_tokens": 150,
            "temperature": 0.7,
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .json(&body);

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?.error_for_status()?;
        let json: serde_json::Value = res.json().await?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .context("Failed to parse content from narrator response")?;

        Ok(truncate_text(content.trim(), MAX_RATIONALE_BYTES))
    }
}

/// Rationales keyed by a digest of the composition and meta context.
#[derive(Default)]
pub struct NarrationCache {
    entries: RwLock<HashMap<[u8; 32], String>>,
}

impl NarrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(composition: &ScoredComposition, meta: &MetaContext) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&composition.candidate.players)?);
        hasher.update(serde_json::to_vec(meta)?);
        Ok(hasher.finalize().into())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Narrator that consults a [`NarrationCache`] before the wrapped narrator.
/// Failures are not cached.
pub struct CachedNarrator {
    inner: Arc<dyn Narrator>,
    cache: Arc<NarrationCache>,
}

impl CachedNarrator {
    pub fn new(inner: Arc<dyn Narrator>, cache: Arc<NarrationCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Narrator for CachedNarrator {
    async fn explain(&self, composition: &ScoredComposition, meta: &MetaContext) -> Result<String> {
        let key = NarrationCache::key(composition, meta)?;
        if let Some(hit) = self.cache.entries.read().await.get(&key) {
            tracing::debug!(composition_id = %composition.candidate.composition_id, "Narration cache hit");
            return Ok(hit.clone());
        }

        let text = self.inner.explain(composition, meta).await?;
        self.cache.entries.write().await.insert(key, text.clone());
        Ok(text)
    }
}
