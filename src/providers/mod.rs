//! Collaborator Interfaces
//!
//! Narrow async seams to the systems the engine does not own: match and
//! patch storage, the player graph, the synergy model, champion pools, meta
//! tracking and narration. Every call is fallible and may be slow.

pub mod inference;
pub mod mock;
pub mod narrator;

pub use inference::HttpSynergyModel;
pub use narrator::{CachedNarrator, LlmNarrator, NarrationCache};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::composition::{MetaContext, ScoredComposition};
use crate::patch::PatchRecord;

#[async_trait]
pub trait PatchHistoryProvider: Send + Sync {
    /// Per-patch records for a player, oldest first. May hold fewer than
    /// three entries.
    async fn patch_records(&self, player_id: &str, season: Option<&str>) -> Result<Vec<PatchRecord>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerNode {
    pub player_id: String,
    pub matches_played: u32,
    pub win_rate: f64,
}

/// Co-play relationship between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoPlayEdge {
    pub source: String,
    pub target: String,
    pub co_play_count: u32,
    pub combined_win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerGraph {
    pub nodes: Vec<PlayerNode>,
    pub edges: Vec<CoPlayEdge>,
}

#[async_trait]
pub trait PlayerGraphProvider: Send + Sync {
    async fn player_graph(&self, player_id: &str, depth: u32) -> Result<PlayerGraph>;
}

/// Opaque pairwise synergy model. Returns one score per entry of
/// `edge_index`, in order.
#[async_trait]
pub trait SynergyModel: Send + Sync {
    async fn score(&self, node_features: &[Vec<f64>], edge_index: &[(usize, usize)]) -> Result<Vec<f64>>;
}

#[async_trait]
pub trait ChampionPoolProvider: Send + Sync {
    async fn champion_pools(&self, player_ids: &[String]) -> Result<HashMap<String, Vec<String>>>;
}

#[async_trait]
pub trait MetaContextProvider: Send + Sync {
    async fn current_meta(&self, patch: Option<&str>) -> Result<MetaContext>;
}

#[async_trait]
pub trait Narrator: Send + Sync {
    /// Short natural-language rationale for a ranked composition.
    async fn explain(&self, composition: &ScoredComposition, meta: &MetaContext) -> Result<String>;
}
