//! Composition Module
//!
//! Generates candidate team compositions from player champion pools, scores
//! them against the synergy matrix and the current meta, and ranks them.

pub mod candidate;
pub mod catalog;
pub mod meta;
pub mod scoring;
pub mod synergy;

pub use candidate::{candidate_budget, generate_candidates, CompositionCandidate, PlayerPick};
pub use catalog::{ChampionCatalog, Role};
pub use meta::MetaContext;
pub use scoring::{score_candidate, ChampionSynergy, ScoredComposition};
pub use synergy::SynergyMatrix;

use futures_util::stream::{self, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{EngineError, Result};
use crate::providers::Narrator;

pub const SUPPORTED_PLAYERS: RangeInclusive<usize> = 2..=5;
pub const FALLBACK_REASONING: &str =
    "This composition shows strong synergy potential and aligns with current meta trends";
const ALTERNATIVE_REASONING: &str = "Provides similar utility with different power spikes";
const PLAYERS_PER_ALTERNATIVE: usize = 2;
/// Upper bound on narrator calls in flight, whatever `top_k` is.
pub const MAX_CONCURRENT_NARRATIONS: usize = 5;

/// Everything the scorer needs for one prediction.
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub player_ids: Vec<String>,
    pub champion_pools: HashMap<String, Vec<String>>,
    pub synergy_matrix: SynergyMatrix,
    pub meta: MetaContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativePick {
    pub player_id: String,
    pub current_champion: String,
    pub alternative_champions: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub patch_version: String,
    pub top_compositions: Vec<ScoredComposition>,
    pub alternative_picks: Vec<AlternativePick>,
    pub meta_summary: String,
}

impl PredictionReport {
    pub fn empty() -> Self {
        Self {
            patch_version: "unknown".to_string(),
            top_compositions: Vec::new(),
            alternative_picks: Vec::new(),
            meta_summary: "Unable to generate predictions".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScorerSettings {
    /// Hard cap on candidate draws, applied on top of `2^players`.
    pub max_candidates: usize,
    /// Compositions that are returned and narrated.
    pub top_k: usize,
    /// Leading (pre-ranking) candidates mined for alternative picks.
    pub alternative_sample: usize,
    pub narrator_timeout: Duration,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            max_candidates: 20,
            top_k: 5,
            alternative_sample: 10,
            narrator_timeout: Duration::from_secs(10),
        }
    }
}

/// Generates, scores and ranks compositions. Holds no per-request state.
pub struct CompositionScorer {
    catalog: Arc<ChampionCatalog>,
    narrator: Arc<dyn Narrator>,
    settings: ScorerSettings,
}

impl CompositionScorer {
    pub fn new(catalog: Arc<ChampionCatalog>, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            catalog,
            narrator,
            settings: ScorerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ScorerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &ChampionCatalog {
        &self.catalog
    }

    /// Rank compositions for the request. Never fails: any error yields
    /// [`PredictionReport::empty`].
    pub async fn predict<R: Rng + Send + ?Sized>(&self, request: &CompositionRequest, rng: &mut R) -> PredictionReport {
        match self.try_predict(request, rng).await {
            Ok(report) => report,
            Err(e) => {
                error!("Composition prediction failed: {}", e);
                PredictionReport::empty()
            }
        }
    }

    pub async fn try_predict<R: Rng + Send + ?Sized>(
        &self,
        request: &CompositionRequest,
        rng: &mut R,
    ) -> Result<PredictionReport> {
        let players = request.player_ids.len();
        if !SUPPORTED_PLAYERS.contains(&players) {
            return Err(EngineError::PlayerCount(players));
        }
        if request.synergy_matrix.len() != players {
            return Err(EngineError::MatrixShape {
                expected: players,
                actual: request.synergy_matrix.len(),
            });
        }

        let candidates = generate_candidates(
            &request.player_ids,
            &request.champion_pools,
            &self.catalog,
            self.settings.max_candidates,
            &mut *rng,
        );
        if candidates.is_empty() {
            return Err(EngineError::NoCandidates);
        }
        debug!(candidates = candidates.len(), "Generated composition candidates");

        let alternative_picks = self.alternatives(&candidates);

        let mut ranked: Vec<ScoredComposition> = candidates
            .into_iter()
            .map(|c| score_candidate(c, &request.synergy_matrix, &request.meta, &mut *rng))
            .collect();
        ranked.sort_by(|a, b| b.predicted_win_rate.total_cmp(&a.predicted_win_rate));
        ranked.truncate(self.settings.top_k);

        self.attach_reasoning(&mut ranked, &request.meta).await;

        let meta_summary = meta_summary(&request.meta, &ranked);
        info!("Generated {} composition predictions", ranked.len());

        Ok(PredictionReport {
            patch_version: request.meta.patch_or_latest().to_string(),
            top_compositions: ranked,
            alternative_picks,
            meta_summary,
        })
    }

    /// Ask the narrator about every ranked composition, at most
    /// [`MAX_CONCURRENT_NARRATIONS`] at a time; a failed or slow call only
    /// costs that composition its own rationale.
    async fn attach_reasoning(&self, ranked: &mut [ScoredComposition], meta: &MetaContext) {
        let narrations: Vec<_> = ranked.iter().map(|comp| self.narrate(comp, meta)).collect();
        let rationales: Vec<String> = stream::iter(narrations)
            .buffered(MAX_CONCURRENT_NARRATIONS)
            .collect()
            .await;

        for (comp, rationale) in ranked.iter_mut().zip(rationales) {
            comp.reasoning = Some(rationale);
        }
    }

    async fn narrate(&self, comp: &ScoredComposition, meta: &MetaContext) -> String {
        let id = comp.candidate.composition_id.as_str();
        match tokio::time::timeout(self.settings.narrator_timeout, self.narrator.explain(comp, meta)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                warn!(composition_id = id, "Narrator returned an empty rationale");
                FALLBACK_REASONING.to_string()
            }
            Ok(Err(e)) => {
                warn!(composition_id = id, "Reasoning generation failed: {}", e);
                FALLBACK_REASONING.to_string()
            }
            Err(_) => {
                warn!(composition_id = id, "Reasoning generation timed out");
                FALLBACK_REASONING.to_string()
            }
        }
    }

    fn alternatives(&self, candidates: &[CompositionCandidate]) -> Vec<AlternativePick> {
        candidates
            .iter()
            .take(self.settings.alternative_sample)
            .flat_map(|c| c.players.iter().take(PLAYERS_PER_ALTERNATIVE))
            .map(|pick| AlternativePick {
                player_id: pick.player_id.clone(),
                current_champion: pick.champion.clone(),
                alternative_champions: self.catalog.alternatives_for(&pick.champion),
                reasoning: ALTERNATIVE_REASONING.to_string(),
            })
            .collect()
    }
}

fn meta_summary(meta: &MetaContext, top: &[ScoredComposition]) -> String {
    let mean = if top.is_empty() {
        0.0
    } else {
        top.iter().map(|c| c.predicted_win_rate).sum::<f64>() / top.len() as f64
    };
    format!(
        "In patch {}, compositions focusing on {} are projected to achieve {:.1}% win rate on average",
        meta.patch_or_latest(),
        meta.headline_trend(),
        mean * 100.0
    )
}
