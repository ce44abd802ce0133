//! Synergy Engine
//!
//! Wires the collaborators to the adaptation analyzer, the chemistry
//! analysis and the composition scorer. Independent collaborator calls are
//! awaited together; every public operation degrades to an empty report
//! instead of failing.

use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::adaptation::{AdaptationAnalyzer, AdaptationReport};
use crate::chemistry::{analyze_chemistry, ChemistryReport};
use crate::composition::{
    ChampionCatalog, CompositionRequest, CompositionScorer, PredictionReport, SynergyMatrix, SUPPORTED_PLAYERS,
};
use crate::config::EngineConfig;
use crate::patch::{meta_impacts, MetaImpact};
use crate::providers::{
    ChampionPoolProvider, MetaContextProvider, Narrator, PatchHistoryProvider, PlayerGraph, PlayerGraphProvider,
    SynergyModel,
};

/// Collaborator handles the engine is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub history: Arc<dyn PatchHistoryProvider>,
    pub graph: Arc<dyn PlayerGraphProvider>,
    pub model: Arc<dyn SynergyModel>,
    pub pools: Arc<dyn ChampionPoolProvider>,
    pub meta: Arc<dyn MetaContextProvider>,
    pub narrator: Arc<dyn Narrator>,
}

pub struct SynergyEngine {
    config: EngineConfig,
    collaborators: Collaborators,
    analyzer: AdaptationAnalyzer,
    scorer: CompositionScorer,
}

impl SynergyEngine {
    pub fn new(config: EngineConfig, collaborators: Collaborators, catalog: Arc<ChampionCatalog>) -> Self {
        let scorer = CompositionScorer::new(catalog, collaborators.narrator.clone())
            .with_settings(config.scorer_settings());
        Self {
            config,
            collaborators,
            analyzer: AdaptationAnalyzer::new(),
            scorer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adaptation report for one player's patch history.
    pub async fn analyze_adaptation(&self, player_id: &str, season: Option<&str>) -> AdaptationReport {
        let span = info_span!("analyze_adaptation", request_id = %Uuid::new_v4(), player_id);
        async {
            match self.collaborators.history.patch_records(player_id, season).await {
                Ok(records) => self.analyzer.analyze(player_id, &records),
                Err(e) => {
                    error!("Failed to load patch history: {:#}", e);
                    AdaptationReport::empty(player_id)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Per-patch impact scores; empty when history is unavailable.
    pub async fn patch_impacts(&self, player_id: &str, season: Option<&str>) -> Vec<MetaImpact> {
        match self.collaborators.history.patch_records(player_id, season).await {
            Ok(mut records) => {
                records.sort_by_key(|r| r.patch_version);
                meta_impacts(&records)
            }
            Err(e) => {
                error!(player_id, "Failed to load patch history: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Ranked compositions for 2-5 players under the given (or current) patch.
    pub async fn predict_compositions(&self, player_ids: &[String], patch: Option<&str>) -> PredictionReport {
        let span = info_span!(
            "predict_compositions",
            request_id = %Uuid::new_v4(),
            players = player_ids.len()
        );
        async {
            if !SUPPORTED_PLAYERS.contains(&player_ids.len()) {
                warn!("Unsupported player count {}", player_ids.len());
                return PredictionReport::empty();
            }

            let meta = match self.collaborators.meta.current_meta(patch).await {
                Ok(meta) => meta,
                Err(e) => {
                    error!("Failed to load meta context: {:#}", e);
                    return PredictionReport::empty();
                }
            };

            let (synergy_matrix, pools) = tokio::join!(
                self.load_synergy_matrix(player_ids),
                self.collaborators.pools.champion_pools(player_ids)
            );
            let champion_pools = match pools {
                Ok(pools) => pools,
                Err(e) => {
                    error!("Failed to load champion pools: {:#}", e);
                    return PredictionReport::empty();
                }
            };

            let request = CompositionRequest {
                player_ids: player_ids.to_vec(),
                champion_pools,
                synergy_matrix,
                meta,
            };
            let mut rng = self.rng();
            self.scorer.predict(&request, &mut rng).await
        }
        .instrument(span)
        .await
    }

    /// Build the player synergy matrix from co-play edges among the
    /// requested players, scored by the synergy model. Model failure scores
    /// every edge 0.0; pairs without an edge get the configured default.
    pub async fn load_synergy_matrix(&self, player_ids: &[String]) -> SynergyMatrix {
        let scored = self.score_edges(player_ids).await;

        let mut matrix = SynergyMatrix::uniform(player_ids.len(), self.config.default_pair_synergy);
        for &((a, b), score) in &scored {
            matrix.set_pair(a, b, score);
        }
        info!(edges = scored.len(), "Built synergy matrix");
        matrix
    }

    /// Strong pairs, friction zones and an overall grade for the co-play
    /// edges among the requested players. Empty when there are no edges.
    pub async fn analyze_chemistry(&self, player_ids: &[String], patch: Option<&str>) -> ChemistryReport {
        let span = info_span!(
            "analyze_chemistry",
            request_id = %Uuid::new_v4(),
            players = player_ids.len()
        );
        async {
            let scored = self.score_edges(player_ids).await;
            if scored.is_empty() {
                warn!("Empty graph data");
                return ChemistryReport::empty();
            }

            let (edges, scores): (Vec<(String, String)>, Vec<f64>) = scored
                .into_iter()
                .map(|((a, b), score)| ((player_ids[a].clone(), player_ids[b].clone()), score))
                .unzip();
            let report = analyze_chemistry(&edges, &scores, patch);
            info!(edges = edges.len(), "Analyzed synergies");
            report
        }
        .instrument(span)
        .await
    }

    /// Deduplicated co-play edges among the requested players, as index
    /// pairs `(low, high)`, each with its model score.
    async fn score_edges(&self, player_ids: &[String]) -> Vec<((usize, usize), f64)> {
        let index: HashMap<&str, usize> = player_ids.iter().enumerate().map(|(i, p)| (p.as_str(), i)).collect();

        let lookups = player_ids
            .iter()
            .map(|id| self.collaborators.graph.player_graph(id, self.config.graph_depth));
        let graphs: Vec<PlayerGraph> = join_all(lookups)
            .await
            .into_iter()
            .zip(player_ids)
            .filter_map(|(res, id)| match res {
                Ok(graph) => Some(graph),
                Err(e) => {
                    warn!(player_id = %id, "Player graph lookup failed: {:#}", e);
                    None
                }
            })
            .collect();

        let mut features = vec![vec![0.0, 0.0]; player_ids.len()];
        let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
        for graph in &graphs {
            for node in &graph.nodes {
                if let Some(&i) = index.get(node.player_id.as_str()) {
                    features[i] = vec![node.win_rate, f64::from(node.matches_played).ln_1p()];
                }
            }
            for edge in &graph.edges {
                if let (Some(&a), Some(&b)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                    if a != b {
                        edges.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        let edge_index: Vec<(usize, usize)> = edges.into_iter().collect();
        if edge_index.is_empty() {
            return Vec::new();
        }

        let scores = match self.collaborators.model.score(&features, &edge_index).await {
            Ok(scores) if scores.len() == edge_index.len() => scores,
            Ok(scores) => {
                warn!("Synergy model returned {} scores for {} edges", scores.len(), edge_index.len());
                vec![0.0; edge_index.len()]
            }
            Err(e) => {
                warn!("Synergy model failed: {:#}", e);
                vec![0.0; edge_index.len()]
            }
        };

        edge_index.into_iter().zip(scores).collect()
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
