use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PatchVersion;
use crate::error::EngineError;

/// One player's aggregated stats for one patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub patch_version: PatchVersion,
    pub patch_date: NaiveDate,
    pub games_played: u32,
    /// Fraction of games won, in `[0, 1]`.
    pub win_rate: f64,
    #[serde(default)]
    pub avg_kda: f64,
    #[serde(default)]
    pub avg_gold: f64,
    #[serde(default)]
    pub avg_damage: f64,
    #[serde(default)]
    pub major_changes: Vec<String>,
}

impl PatchRecord {
    pub fn new(patch_version: PatchVersion, patch_date: NaiveDate, games_played: u32, win_rate: f64) -> Self {
        Self {
            patch_version,
            patch_date,
            games_played,
            win_rate,
            avg_kda: 0.0,
            avg_gold: 0.0,
            avg_damage: 0.0,
            major_changes: Vec::new(),
        }
    }

    pub fn with_aux(mut self, avg_kda: f64, avg_gold: f64, avg_damage: f64) -> Self {
        self.avg_kda = avg_kda;
        self.avg_gold = avg_gold;
        self.avg_damage = avg_damage;
        self
    }

    pub fn with_change(mut self, change: impl Into<String>) -> Self {
        self.major_changes.push(change.into());
        self
    }

    /// Reject records whose win rate cannot take part in arithmetic.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.win_rate.is_finite() || !(0.0..=1.0).contains(&self.win_rate) {
            return Err(EngineError::InvalidRecord {
                patch: self.patch_version.to_string(),
                reason: format!("win rate {} outside [0, 1]", self.win_rate),
            });
        }
        Ok(())
    }
}
