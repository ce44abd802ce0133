use serde::{Deserialize, Serialize};

use crate::patch::{PatchRecord, PatchVersion};

/// Direction of a patch-over-patch performance change.
///
/// A zero delta counts as `Negative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Positive,
    Negative,
}

impl TransitionKind {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            TransitionKind::Positive
        } else {
            TransitionKind::Negative
        }
    }
}

/// Performance change between two consecutive patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from_patch: PatchVersion,
    pub to_patch: PatchVersion,
    pub performance_delta: f64,
    pub adaptation_games: u32,
    pub kind: TransitionKind,
    pub magnitude: f64,
}

/// Games needed to re-stabilize after a shift of `gap`, capped by the games
/// actually played on the new patch.
pub fn estimate_adaptation_games(gap: f64, games_played: u32) -> u32 {
    let gap = gap.abs();
    let needed = if gap < 0.05 {
        5
    } else if gap < 0.10 {
        10
    } else if gap < 0.15 {
        20
    } else {
        30
    };
    needed.min(games_played)
}

/// One transition per adjacent pair of records.
pub fn derive_transitions(records: &[PatchRecord]) -> Vec<Transition> {
    records
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            let delta = curr.win_rate - prev.win_rate;
            Transition {
                from_patch: prev.patch_version,
                to_patch: curr.patch_version,
                performance_delta: delta,
                adaptation_games: estimate_adaptation_games(delta, curr.games_played),
                kind: TransitionKind::from_delta(delta),
                magnitude: delta.abs(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delta_is_negative() {
        assert_eq!(TransitionKind::from_delta(0.0), TransitionKind::Negative);
        assert_eq!(TransitionKind::from_delta(-0.01), TransitionKind::Negative);
        assert_eq!(TransitionKind::from_delta(0.01), TransitionKind::Positive);
    }

    #[test]
    fn test_adaptation_games_steps() {
        assert_eq!(estimate_adaptation_games(0.01, 100), 5);
        assert_eq!(estimate_adaptation_games(-0.07, 100), 10);
        assert_eq!(estimate_adaptation_games(0.12, 100), 20);
        assert_eq!(estimate_adaptation_games(0.4, 100), 30);
    }

    #[test]
    fn test_adaptation_games_capped_by_games_played() {
        assert_eq!(estimate_adaptation_games(0.4, 12), 12);
        assert_eq!(estimate_adaptation_games(0.01, 0), 0);
    }

    #[test]
    fn test_adaptation_games_monotonic_in_gap() {
        for games in [0, 3, 7, 15, 25, 60] {
            let mut last = 0;
            for step in 0..=40 {
                let estimate = estimate_adaptation_games(step as f64 * 0.01, games);
                assert!(estimate >= last);
                assert!(estimate <= games);
                last = estimate;
            }
        }
    }
}
