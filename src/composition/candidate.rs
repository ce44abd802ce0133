use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::{ChampionCatalog, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPick {
    pub player_id: String,
    pub champion: String,
    pub role: Role,
}

/// One full assignment of champions to the requested players, in request
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionCandidate {
    pub composition_id: String,
    pub players: Vec<PlayerPick>,
}

impl CompositionCandidate {
    pub fn champions(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.champion.as_str())
    }
}

/// Upper bound on draws for `players` requested players: `min(cap, 2^players)`.
pub fn candidate_budget(players: usize, cap: usize) -> usize {
    u32::try_from(players)
        .ok()
        .and_then(|p| 1usize.checked_shl(p))
        .map_or(cap, |n| n.min(cap))
}

/// Draw candidates independently: each player's champion is sampled
/// uniformly from their pool. Duplicates are kept. A draw in which any
/// player has an empty pool is dropped but still consumes its index.
pub fn generate_candidates<R: Rng + ?Sized>(
    player_ids: &[String],
    pools: &HashMap<String, Vec<String>>,
    catalog: &ChampionCatalog,
    cap: usize,
    rng: &mut R,
) -> Vec<CompositionCandidate> {
    let draws = candidate_budget(player_ids.len(), cap);
    let mut candidates = Vec::with_capacity(draws);

    for draw in 0..draws {
        let players: Vec<PlayerPick> = player_ids
            .iter()
            .filter_map(|player_id| {
                let pool = pools.get(player_id)?;
                let champion = pool.choose(&mut *rng)?;
                Some(PlayerPick {
                    player_id: player_id.clone(),
                    champion: champion.clone(),
                    role: catalog.role_for(champion),
                })
            })
            .collect();

        if players.len() == player_ids.len() {
            candidates.push(CompositionCandidate {
                composition_id: format!("comp_{}", draw),
                players,
            });
        }
    }

    candidates
}
