//! Patch History
//!
//! Aggregates raw match history into per-patch records and scores how hard
//! each patch shifted a player's results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{PatchRecord, PatchVersion};

/// A single played match as reported by the data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Full client build string, e.g. `14.21.623.5511`.
    pub game_version: String,
    pub played_on: NaiveDate,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    #[serde(default)]
    pub gold: f64,
    #[serde(default)]
    pub damage: f64,
}

#[derive(Default)]
struct PatchTally {
    first_played: Option<NaiveDate>,
    games: u32,
    wins: u32,
    kills: u64,
    deaths: u64,
    assists: u64,
    gold: f64,
    damage: f64,
}

impl PatchTally {
    fn add(&mut self, m: &MatchRecord) {
        self.first_played = Some(match self.first_played {
            Some(d) if d <= m.played_on => d,
            _ => m.played_on,
        });
        self.games += 1;
        if m.win {
            self.wins += 1;
        }
        self.kills += u64::from(m.kills);
        self.deaths += u64::from(m.deaths);
        self.assists += u64::from(m.assists);
        self.gold += m.gold;
        self.damage += m.damage;
    }

    fn kda(&self) -> f64 {
        let takedowns = (self.kills + self.assists) as f64;
        if self.deaths > 0 {
            takedowns / self.deaths as f64
        } else {
            takedowns
        }
    }
}

/// Builds chronological [`PatchRecord`]s out of match history.
#[derive(Debug, Default)]
pub struct PatchHistoryBuilder {
    patch_notes: HashMap<PatchVersion, Vec<String>>,
}

impl PatchHistoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach "major change" tags to a patch.
    pub fn with_patch_notes(mut self, patch: PatchVersion, changes: Vec<String>) -> Self {
        self.patch_notes.insert(patch, changes);
        self
    }

    pub fn build(&self, matches: &[MatchRecord]) -> Vec<PatchRecord> {
        let mut tallies: BTreeMap<PatchVersion, PatchTally> = BTreeMap::new();

        for m in matches {
            match PatchVersion::from_game_version(&m.game_version) {
                Ok(patch) => tallies.entry(patch).or_default().add(m),
                Err(e) => warn!(game_version = %m.game_version, "Skipping match: {}", e),
            }
        }

        debug!("Grouped {} matches into {} patches", matches.len(), tallies.len());

        tallies
            .into_iter()
            .filter_map(|(patch, tally)| {
                let date = tally.first_played?;
                let games = f64::from(tally.games);
                Some(PatchRecord {
                    patch_version: patch,
                    patch_date: date,
                    games_played: tally.games,
                    win_rate: f64::from(tally.wins) / games,
                    avg_kda: tally.kda(),
                    avg_gold: tally.gold / games,
                    avg_damage: tally.damage / games,
                    major_changes: self.patch_notes.get(&patch).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    Positive,
    Negative,
}

/// How strongly a patch moved a player's results relative to the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaImpact {
    pub patch_version: PatchVersion,
    pub impact_score: f64,
    pub direction: ImpactDirection,
}

/// Score each patch by `|Δwin_rate| * 10 + |Δgames| / 100`; the first patch
/// has no baseline and scores zero.
pub fn meta_impacts(records: &[PatchRecord]) -> Vec<MetaImpact> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let impact_score = if i == 0 {
                0.0
            } else {
                let prev = &records[i - 1];
                let wr_delta = rec.win_rate - prev.win_rate;
                let games_delta = f64::from(rec.games_played) - f64::from(prev.games_played);
                wr_delta.abs() * 10.0 + games_delta.abs() / 100.0
            };
            MetaImpact {
                patch_version: rec.patch_version,
                impact_score,
                direction: if impact_score > 0.0 {
                    ImpactDirection::Positive
                } else {
                    ImpactDirection::Negative
                },
            }
        })
        .collect()
}
