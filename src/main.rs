//! Synergy Scope demo
//!
//! Runs both analyses against in-memory collaborators and prints the reports
//! as JSON. Player ids may be passed as arguments (2-5 of them).
//!
//! Environment:
//! - `SYNERGY_NARRATOR_API_KEY` switches narration to the chat-completions endpoint
//! - `SYNERGY_INFERENCE_URL` scores co-play edges with a remote model
//! - `SYNERGY_CATALOG_PATH` loads a champion catalog from JSON

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use synergy_scope::composition::ChampionCatalog;
use synergy_scope::providers::mock::{
    demo_history, demo_meta, ConstantSynergyModel, InMemoryChampionPools, InMemoryPatchHistory, InMemoryPlayerGraph,
    StaticMetaProvider, TemplateNarrator,
};
use synergy_scope::providers::{
    CachedNarrator, CoPlayEdge, HttpSynergyModel, LlmNarrator, NarrationCache, Narrator, PlayerGraph, PlayerNode,
    SynergyModel,
};
use synergy_scope::utils::init_tracing;
use synergy_scope::{Collaborators, EngineConfig, SynergyEngine};

const DEMO_PLAYERS: [&str; 3] = ["player_a", "player_b", "player_c"];
const DEMO_POOLS: [&[&str]; 5] = [
    &["Jinx", "Caitlyn", "Ezreal"],
    &["Thresh", "Leona", "Nautilus"],
    &["Lee Sin", "Graves", "Kindred"],
    &["Darius", "Garen", "Sett"],
    &["Ahri", "Zed", "Syndra"],
];

fn demo_graph(players: &[String]) -> PlayerGraph {
    let nodes = players
        .iter()
        .enumerate()
        .map(|(i, id)| PlayerNode {
            player_id: id.clone(),
            matches_played: 120 + i as u32 * 40,
            win_rate: 0.5 + i as f64 * 0.02,
        })
        .collect();
    let edges = players
        .windows(2)
        .map(|pair| CoPlayEdge {
            source: pair[0].clone(),
            target: pair[1].clone(),
            co_play_count: 25,
            combined_win_rate: 0.56,
        })
        .collect();
    PlayerGraph { nodes, edges }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = EngineConfig::from_env()?;
    init_tracing(config.log_json)?;

    let players: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            DEMO_PLAYERS.iter().map(|p| p.to_string()).collect()
        } else {
            args
        }
    };

    println!("\n{}", "═".repeat(60));
    println!("🎮 Synergy Scope v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));
    println!("Features: Patch Adaptation | Chemistry | Composition Prediction");
    println!("{}\n", "═".repeat(60));

    let catalog = match &config.catalog_path {
        Some(path) => ChampionCatalog::load(path).await?,
        None => ChampionCatalog::default(),
    };
    println!("📚 Catalog: {} ({} champions)", catalog.version, catalog.champions().count());

    let narrator: Arc<dyn Narrator> = match &config.narrator.api_key {
        Some(key) => {
            info!(model = %config.narrator.model, "Using LLM narrator");
            let llm = LlmNarrator::new(
                config.narrator.base_url.clone(),
                Some(key.clone()),
                config.narrator.model.clone(),
            );
            Arc::new(CachedNarrator::new(Arc::new(llm), Arc::new(NarrationCache::new())))
        }
        None => Arc::new(TemplateNarrator),
    };
    let model: Arc<dyn SynergyModel> = match &config.inference_url {
        Some(url) => Arc::new(HttpSynergyModel::new(url.clone())),
        None => Arc::new(ConstantSynergyModel(0.82)),
    };

    let pools = players
        .iter()
        .zip(DEMO_POOLS)
        .fold(InMemoryChampionPools::new(), |pools, (id, champions)| {
            pools.with_pool(id.clone(), champions)
        });

    let collaborators = Collaborators {
        history: Arc::new(InMemoryPatchHistory::new().with_fallback(demo_history())),
        graph: Arc::new(InMemoryPlayerGraph::new(demo_graph(&players))),
        model,
        pools: Arc::new(pools),
        meta: Arc::new(StaticMetaProvider::new(demo_meta())),
        narrator,
    };
    let engine = SynergyEngine::new(config, collaborators, Arc::new(catalog));

    let (adaptation, chemistry, prediction) = tokio::join!(
        engine.analyze_adaptation(&players[0], None),
        engine.analyze_chemistry(&players, None),
        engine.predict_compositions(&players, None)
    );

    println!("📈 Adaptation report for '{}':", players[0]);
    println!("{}\n", serde_json::to_string_pretty(&adaptation)?);
    println!("🤝 Chemistry for {}:", players.join(", "));
    println!("{}\n", serde_json::to_string_pretty(&chemistry)?);
    println!("🧩 Composition predictions for {}:", players.join(", "));
    println!("{}\n", serde_json::to_string_pretty(&prediction)?);

    Ok(())
}
