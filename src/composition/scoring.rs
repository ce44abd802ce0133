use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::candidate::{CompositionCandidate, PlayerPick};
use super::meta::MetaContext;
use super::synergy::SynergyMatrix;

/// Synergy used when a candidate has no player pairs.
pub const EMPTY_PAIR_SYNERGY: f64 = 0.7;
/// Keeps predictions below certainty.
const PREDICTION_CEILING: f64 = 0.95;
const SYNERGY_WEIGHT: f64 = 0.6;
const ALIGNMENT_WEIGHT: f64 = 0.4;
/// Pairs reported in the synergy breakdown.
const MAX_BREAKDOWN_PAIRS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionSynergy {
    pub champion_a: String,
    pub champion_b: String,
    pub synergy_score: f64,
    pub games_played: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComposition {
    #[serde(flatten)]
    pub candidate: CompositionCandidate,
    pub predicted_win_rate: f64,
    pub confidence_score: f64,
    /// Mean pairwise player synergy the prediction was built from.
    pub synergy: f64,
    pub meta_alignment: f64,
    pub synergy_breakdown: Vec<ChampionSynergy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Share of dominant champions present in the candidate, plus a jitter in
/// `[0.1, 0.3]` to spread otherwise tied candidates, capped at 1.0.
pub fn meta_alignment<R: Rng + ?Sized>(candidate: &CompositionCandidate, meta: &MetaContext, rng: &mut R) -> f64 {
    let picked: HashSet<&str> = candidate.champions().collect();
    let dominant: HashSet<&str> = meta.dominant_champions.iter().map(String::as_str).collect();
    let overlap = picked.intersection(&dominant).count() as f64;
    let alignment = overlap / meta.dominant_champions.len().max(1) as f64;

    (alignment + rng.gen_range(0.1..=0.3)).min(1.0)
}

pub fn predicted_win_rate(synergy: f64, alignment: f64) -> f64 {
    (synergy * SYNERGY_WEIGHT + alignment * ALIGNMENT_WEIGHT) * PREDICTION_CEILING
}

/// Per-pair champion figures. These stand in for a per-pair model and are
/// sampled, not measured.
pub fn champion_synergies<R: Rng + ?Sized>(players: &[PlayerPick], rng: &mut R) -> Vec<ChampionSynergy> {
    let mut out = Vec::new();
    for i in 0..players.len() {
        for j in (i + 1)..players.len() {
            if out.len() == MAX_BREAKDOWN_PAIRS {
                return out;
            }
            out.push(ChampionSynergy {
                champion_a: players[i].champion.clone(),
                champion_b: players[j].champion.clone(),
                synergy_score: round2(rng.gen_range(0.6..=0.95)),
                games_played: rng.gen_range(10..100),
                win_rate: round2(rng.gen_range(0.45..=0.65)),
            });
        }
    }
    out
}

pub fn score_candidate<R: Rng + ?Sized>(
    candidate: CompositionCandidate,
    matrix: &SynergyMatrix,
    meta: &MetaContext,
    rng: &mut R,
) -> ScoredComposition {
    let synergy = matrix.mean_pairwise(candidate.players.len(), EMPTY_PAIR_SYNERGY);
    let alignment = meta_alignment(&candidate, meta, rng);
    let synergy_breakdown = champion_synergies(&candidate.players, rng);

    ScoredComposition {
        predicted_win_rate: predicted_win_rate(synergy, alignment),
        confidence_score: synergy * alignment,
        synergy,
        meta_alignment: alignment,
        synergy_breakdown,
        reasoning: None,
        candidate,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::catalog::Role;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(champions: &[&str]) -> CompositionCandidate {
        CompositionCandidate {
            composition_id: "comp_0".to_string(),
            players: champions
                .iter()
                .enumerate()
                .map(|(i, c)| PlayerPick {
                    player_id: format!("p{}", i),
                    champion: c.to_string(),
                    role: Role::Middle,
                })
                .collect(),
        }
    }

    fn meta(dominant: &[&str]) -> MetaContext {
        MetaContext {
            patch_version: "14.21".to_string(),
            dominant_champions: dominant.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_alignment_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = candidate(&["Jinx", "Zed"]);
        let m = meta(&["Jinx", "Thresh", "Darius", "Lee Sin"]);
        for _ in 0..200 {
            let a = meta_alignment(&c, &m, &mut rng);
            assert!(a >= 0.35 - 1e-9 && a <= 0.55 + 1e-9, "alignment {}", a);
        }
    }

    #[test]
    fn test_alignment_without_dominant_list() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = meta_alignment(&candidate(&["Jinx", "Zed"]), &meta(&[]), &mut rng);
        assert!((0.1..=0.3).contains(&a));
    }

    #[test]
    fn test_alignment_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = meta_alignment(&candidate(&["Jinx", "Thresh"]), &meta(&["Jinx", "Thresh"]), &mut rng);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn test_confidence_is_exact_product() {
        let matrix = SynergyMatrix::from_rows(vec![vec![1.0, 0.8], vec![0.8, 1.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let scored = score_candidate(candidate(&["Jinx", "Zed"]), &matrix, &meta(&["Zed"]), &mut rng);

        assert_eq!(scored.synergy, 0.8);
        assert_eq!(scored.confidence_score, scored.synergy * scored.meta_alignment);
        assert_eq!(
            scored.predicted_win_rate,
            (scored.synergy * 0.6 + scored.meta_alignment * 0.4) * 0.95
        );
    }

    #[test]
    fn test_serialized_shape() {
        let matrix = SynergyMatrix::uniform(2, 0.8);
        let mut rng = StdRng::seed_from_u64(2);
        let mut scored = score_candidate(candidate(&["Jinx", "Zed"]), &matrix, &meta(&[]), &mut rng);

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["composition_id"], "comp_0");
        assert!(json.get("reasoning").is_none());

        scored.reasoning = Some("Lane bully bot side.".to_string());
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["reasoning"], "Lane bully bot side.");
    }

    #[test]
    fn test_breakdown_truncated_to_five_pairs() {
        let mut rng = StdRng::seed_from_u64(5);
        let picks = candidate(&["A", "B", "C", "D", "E"]).players;
        let breakdown = champion_synergies(&picks, &mut rng);
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown[0].champion_a, "A");
        assert_eq!(breakdown[4].champion_a, "B");
        assert_eq!(breakdown[4].champion_b, "C");
        for pair in &breakdown {
            assert!((0.6..=0.95).contains(&pair.synergy_score));
            assert!((10..100).contains(&pair.games_played));
            assert!((0.45..=0.65).contains(&pair.win_rate));
        }
    }
}
