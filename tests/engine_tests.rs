//! Engine Integration Suite
//!
//! Drives the full engine against in-memory and failing collaborators.

#[cfg(test)]
mod engine_tests {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::Arc;
    use synergy_scope::chemistry::{ChemistryGrade, ChemistryReport, ChemistryType};
    use synergy_scope::composition::{ChampionCatalog, MetaContext, PredictionReport};
    use synergy_scope::patch::ImpactDirection;
    use synergy_scope::providers::mock::{
        demo_history, demo_meta, ConstantSynergyModel, InMemoryChampionPools, InMemoryPatchHistory,
        InMemoryPlayerGraph, StaticMetaProvider, TemplateNarrator,
    };
    use synergy_scope::providers::{
        CoPlayEdge, MetaContextProvider, PatchHistoryProvider, PlayerGraph, PlayerNode, SynergyModel,
    };
    use synergy_scope::{AdaptationReport, Collaborators, EngineConfig, PatchRecord, SynergyEngine};

    struct BrokenHistory;

    #[async_trait]
    impl PatchHistoryProvider for BrokenHistory {
        async fn patch_records(&self, _player_id: &str, _season: Option<&str>) -> Result<Vec<PatchRecord>> {
            bail!("match store unavailable")
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl SynergyModel for BrokenModel {
        async fn score(&self, _node_features: &[Vec<f64>], _edge_index: &[(usize, usize)]) -> Result<Vec<f64>> {
            bail!("inference service down")
        }
    }

    /// Returns one score too few.
    struct ShortModel;

    #[async_trait]
    impl SynergyModel for ShortModel {
        async fn score(&self, _node_features: &[Vec<f64>], edge_index: &[(usize, usize)]) -> Result<Vec<f64>> {
            Ok(vec![0.9; edge_index.len().saturating_sub(1)])
        }
    }

    struct BrokenMeta;

    #[async_trait]
    impl MetaContextProvider for BrokenMeta {
        async fn current_meta(&self, _patch: Option<&str>) -> Result<MetaContext> {
            bail!("meta tracker timed out")
        }
    }

    fn ids(players: &[&str]) -> Vec<String> {
        players.iter().map(|p| p.to_string()).collect()
    }

    fn graph() -> PlayerGraph {
        let node = |id: &str| PlayerNode {
            player_id: id.to_string(),
            matches_played: 80,
            win_rate: 0.54,
        };
        let edge = |a: &str, b: &str| CoPlayEdge {
            source: a.to_string(),
            target: b.to_string(),
            co_play_count: 12,
            combined_win_rate: 0.58,
        };
        PlayerGraph {
            nodes: vec![node("a"), node("b"), node("c"), node("outsider")],
            // b-a duplicates a-b; c-outsider falls outside any request
            edges: vec![edge("a", "b"), edge("b", "a"), edge("b", "c"), edge("c", "outsider")],
        }
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            history: Arc::new(InMemoryPatchHistory::new().with_player("a", demo_history())),
            graph: Arc::new(InMemoryPlayerGraph::new(graph())),
            model: Arc::new(ConstantSynergyModel(0.9)),
            pools: Arc::new(
                InMemoryChampionPools::new()
                    .with_pool("a", &["Jinx", "Caitlyn"])
                    .with_pool("b", &["Thresh", "Leona"])
                    .with_pool("c", &["Lee Sin", "Graves"]),
            ),
            meta: Arc::new(StaticMetaProvider::new(demo_meta())),
            narrator: Arc::new(TemplateNarrator),
        }
    }

    fn engine(collaborators: Collaborators) -> SynergyEngine {
        let config = EngineConfig {
            seed: Some(17),
            ..Default::default()
        };
        SynergyEngine::new(config, collaborators, Arc::new(ChampionCatalog::default()))
    }

    #[tokio::test]
    async fn test_adaptation_through_engine() {
        let engine = engine(collaborators());
        let report = engine.analyze_adaptation("a", None).await;
        assert_eq!(report.transitions.len(), 4);
        assert_eq!(report.adaptation_metrics.len(), 5);
        assert!(!report.insights.is_empty());

        // unknown player has no history
        assert_eq!(engine.analyze_adaptation("z", None).await, AdaptationReport::empty("z"));
    }

    #[tokio::test]
    async fn test_history_failure_looks_like_no_data() {
        let engine = engine(Collaborators {
            history: Arc::new(BrokenHistory),
            ..collaborators()
        });
        assert_eq!(engine.analyze_adaptation("a", None).await, AdaptationReport::empty("a"));
        assert!(engine.patch_impacts("a", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_patch_impacts() {
        let impacts = engine(collaborators()).patch_impacts("a", None).await;
        assert_eq!(impacts.len(), 5);
        assert_eq!(impacts[0].impact_score, 0.0);
        assert!(impacts[1..].iter().all(|i| i.direction == ImpactDirection::Positive));
    }

    #[tokio::test]
    async fn test_synergy_matrix_from_graph() {
        let engine = engine(collaborators());
        let matrix = engine.load_synergy_matrix(&ids(&["a", "b", "c"])).await;

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(0, 1), Some(0.9));
        assert_eq!(matrix.get(1, 0), Some(0.9));
        assert_eq!(matrix.get(1, 2), Some(0.9));
        // no co-play edge between a and c
        assert_eq!(matrix.get(0, 2), Some(0.7));
    }

    #[tokio::test]
    async fn test_model_failure_zeroes_edges() {
        for model in [Arc::new(BrokenModel) as Arc<dyn SynergyModel>, Arc::new(ShortModel)] {
            let engine = engine(Collaborators {
                model,
                ..collaborators()
            });
            let matrix = engine.load_synergy_matrix(&ids(&["a", "b", "c"])).await;
            assert_eq!(matrix.get(0, 1), Some(0.0));
            assert_eq!(matrix.get(1, 2), Some(0.0));
            assert_eq!(matrix.get(0, 2), Some(0.7));
            assert_eq!(matrix.get(2, 2), Some(1.0));
        }
    }

    #[tokio::test]
    async fn test_chemistry_from_scored_edges() {
        let report = engine(collaborators())
            .analyze_chemistry(&ids(&["a", "b", "c"]), Some("14.21"))
            .await;

        assert_eq!(report.synergy_scores, vec![0.9, 0.9]);
        assert_eq!(report.strong_pairs.len(), 2);
        assert_eq!(report.strong_pairs[0].player_a, "a");
        assert_eq!(report.strong_pairs[0].player_b, "b");
        assert!(report.friction_zones.is_empty());
        assert_eq!(report.average_synergy, 0.9);
        assert_eq!(report.chemistry_ratings.unwrap().overall_rating, ChemistryGrade::Excellent);
        assert_eq!(report.patch_version.as_deref(), Some("14.21"));
    }

    #[tokio::test]
    async fn test_chemistry_with_failed_model_is_all_friction() {
        let engine = engine(Collaborators {
            model: Arc::new(BrokenModel),
            ..collaborators()
        });
        let report = engine.analyze_chemistry(&ids(&["a", "b", "c"]), None).await;

        assert_eq!(report.friction_zones.len(), 2);
        assert!(report.friction_zones.iter().all(|p| p.chemistry_type == ChemistryType::Friction));
        assert!(report.strong_pairs.is_empty());
        assert_eq!(report.chemistry_ratings.unwrap().overall_rating, ChemistryGrade::NeedsImprovement);
    }

    #[tokio::test]
    async fn test_chemistry_without_edges_is_empty() {
        // a only co-plays with b, who is not requested
        let report = engine(collaborators()).analyze_chemistry(&ids(&["a", "z"]), None).await;
        assert_eq!(report, ChemistryReport::empty());
    }

    #[tokio::test]
    async fn test_predict_compositions() {
        let engine = engine(collaborators());
        let report = engine.predict_compositions(&ids(&["a", "b", "c"]), Some("14.22")).await;

        assert_eq!(report.patch_version, "14.22");
        assert_eq!(report.top_compositions.len(), 5);
        assert!(report
            .top_compositions
            .windows(2)
            .all(|w| w[0].predicted_win_rate >= w[1].predicted_win_rate));
        assert!(report.meta_summary.starts_with("In patch 14.22, compositions focusing on ADC carry meta dominance"));

        // seeded engines are reproducible
        let again = engine.predict_compositions(&ids(&["a", "b", "c"]), Some("14.22")).await;
        assert_eq!(report, again);
    }

    #[tokio::test]
    async fn test_predict_rejects_bad_input() {
        let engine = engine(collaborators());
        assert_eq!(engine.predict_compositions(&ids(&["a"]), None).await, PredictionReport::empty());
        assert_eq!(
            engine.predict_compositions(&ids(&["a", "b", "c", "d", "e", "f"]), None).await,
            PredictionReport::empty()
        );
        // d has no champion pool
        assert_eq!(engine.predict_compositions(&ids(&["a", "d"]), None).await, PredictionReport::empty());

        let engine = self::engine(Collaborators {
            meta: Arc::new(BrokenMeta),
            ..collaborators()
        });
        assert_eq!(engine.predict_compositions(&ids(&["a", "b"]), None).await, PredictionReport::empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let engine = Arc::new(engine(collaborators()));
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        engine.analyze_adaptation("a", None).await.is_empty()
                    } else {
                        engine.predict_compositions(&ids(&["a", "b"]), None).await.top_compositions.is_empty()
                    }
                })
            })
            .collect();

        for task in tasks {
            assert!(!task.await.unwrap());
        }
    }
}
