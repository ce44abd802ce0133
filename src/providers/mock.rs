//! In-memory collaborators for demos and tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet, VecDeque};

use super::{
    ChampionPoolProvider, MetaContextProvider, Narrator, PatchHistoryProvider, PlayerGraph, PlayerGraphProvider,
    SynergyModel,
};
use crate::composition::{MetaContext, ScoredComposition};
use crate::patch::{PatchRecord, PatchVersion};

/// Five patches (14.17 - 14.21) of steadily improving play.
pub fn demo_history() -> Vec<PatchRecord> {
    (0..5u16)
        .map(|i| {
            let games = 20 + u32::from(i) * 5;
            let wins = (f64::from(games) * (0.48 + f64::from(i) * 0.03)) as u32;
            let date = NaiveDate::from_ymd_opt(2024, 9 + u32::from(i) / 2, (u32::from(i) % 2) * 15 + 1)
                .unwrap_or_default();
            let change = if i % 2 == 0 { "ADC buffs" } else { "Jungle nerfs" };
            PatchRecord::new(PatchVersion::new(14, 17 + i), date, games, f64::from(wins) / f64::from(games))
                .with_aux(
                    2.5 + f64::from(i) * 0.2,
                    12_000.0 + f64::from(i) * 500.0,
                    18_000.0 + f64::from(i) * 1_000.0,
                )
                .with_change(change)
        })
        .collect()
}

pub fn demo_meta() -> MetaContext {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    MetaContext {
        patch_version: "14.21".to_string(),
        dominant_champions: owned(&["Jinx", "Caitlyn", "Thresh", "Lee Sin", "Darius"]),
        dominant_roles: owned(&["BOTTOM", "UTILITY", "JUNGLE"]),
        trends: owned(&[
            "ADC carry meta dominance",
            "Tank supports trending upward",
            "Assassin jungle decline",
        ]),
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPatchHistory {
    records: HashMap<String, Vec<PatchRecord>>,
    fallback: Option<Vec<PatchRecord>>,
}

impl InMemoryPatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, player_id: impl Into<String>, records: Vec<PatchRecord>) -> Self {
        self.records.insert(player_id.into(), records);
        self
    }

    /// History served for players without an explicit entry.
    pub fn with_fallback(mut self, records: Vec<PatchRecord>) -> Self {
        self.fallback = Some(records);
        self
    }
}

#[async_trait]
impl PatchHistoryProvider for InMemoryPatchHistory {
    async fn patch_records(&self, player_id: &str, _season: Option<&str>) -> Result<Vec<PatchRecord>> {
        Ok(self
            .records
            .get(player_id)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct StaticMetaProvider {
    meta: MetaContext,
}

impl StaticMetaProvider {
    pub fn new(meta: MetaContext) -> Self {
        Self { meta }
    }
}

#[async_trait]
impl MetaContextProvider for StaticMetaProvider {
    async fn current_meta(&self, patch: Option<&str>) -> Result<MetaContext> {
        let mut meta = self.meta.clone();
        if let Some(patch) = patch {
            meta.patch_version = patch.to_string();
        }
        Ok(meta)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryChampionPools {
    pools: HashMap<String, Vec<String>>,
}

impl InMemoryChampionPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, player_id: impl Into<String>, champions: &[&str]) -> Self {
        self.pools
            .insert(player_id.into(), champions.iter().map(|c| c.to_string()).collect());
        self
    }
}

#[async_trait]
impl ChampionPoolProvider for InMemoryChampionPools {
    async fn champion_pools(&self, player_ids: &[String]) -> Result<HashMap<String, Vec<String>>> {
        Ok(player_ids
            .iter()
            .map(|id| (id.clone(), self.pools.get(id).cloned().unwrap_or_default()))
            .collect())
    }
}

/// Serves neighbourhoods of one fixed graph.
#[derive(Debug, Default)]
pub struct InMemoryPlayerGraph {
    graph: PlayerGraph,
}

impl InMemoryPlayerGraph {
    pub fn new(graph: PlayerGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl PlayerGraphProvider for InMemoryPlayerGraph {
    async fn player_graph(&self, player_id: &str, depth: u32) -> Result<PlayerGraph> {
        let mut reached: HashSet<&str> = HashSet::from([player_id]);
        let mut frontier = VecDeque::from([(player_id, 0u32)]);

        while let Some((current, hops)) = frontier.pop_front() {
            if hops == depth {
                continue;
            }
            for edge in &self.graph.edges {
                let next = if edge.source == current {
                    edge.target.as_str()
                } else if edge.target == current {
                    edge.source.as_str()
                } else {
                    continue;
                };
                if reached.insert(next) {
                    frontier.push_back((next, hops + 1));
                }
            }
        }

        Ok(PlayerGraph {
            nodes: self
                .graph
                .nodes
                .iter()
                .filter(|n| reached.contains(n.player_id.as_str()))
                .cloned()
                .collect(),
            edges: self
                .graph
                .edges
                .iter()
                .filter(|e| reached.contains(e.source.as_str()) && reached.contains(e.target.as_str()))
                .cloned()
                .collect(),
        })
    }
}

/// Scores every edge with the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSynergyModel(pub f64);

#[async_trait]
impl SynergyModel for ConstantSynergyModel {
    async fn score(&self, _node_features: &[Vec<f64>], edge_index: &[(usize, usize)]) -> Result<Vec<f64>> {
        Ok(vec![self.0; edge_index.len()])
    }
}

/// Deterministic rationale built from the picks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn explain(&self, composition: &ScoredComposition, meta: &MetaContext) -> Result<String> {
        let champions: Vec<&str> = composition.candidate.champions().collect();
        Ok(format!(
            "{} combine for {:.0}% pairwise synergy. In patch {} they lean into {}.",
            champions.join(" + "),
            composition.synergy * 100.0,
            meta.patch_or_latest(),
            meta.headline_trend()
        ))
    }
}
