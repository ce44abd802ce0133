use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::period::AdaptationPeriod;
use super::transition::{Transition, TransitionKind};
use crate::patch::{PatchRecord, PatchVersion};

/// Ordinal bucket derived from the overall adaptation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResilienceRating {
    Unknown,
    Excellent,
    Good,
    Moderate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ResilienceRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ResilienceRating::Excellent
        } else if score >= 0.65 {
            ResilienceRating::Good
        } else if score >= 0.5 {
            ResilienceRating::Moderate
        } else {
            ResilienceRating::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResilienceRating::Unknown => "Unknown",
            ResilienceRating::Excellent => "Excellent",
            ResilienceRating::Good => "Good",
            ResilienceRating::Moderate => "Moderate",
            ResilienceRating::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ResilienceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-patch row of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMetric {
    pub patch_version: PatchVersion,
    pub patch_date: NaiveDate,
    pub games_played: u32,
    pub win_rate: f64,
    /// Adaptation-games estimate of the transition into this patch.
    pub adaptation_speed: u32,
    pub performance_delta: f64,
    pub key_changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationReport {
    pub player_id: String,
    pub adaptation_metrics: Vec<PatchMetric>,
    pub transitions: Vec<Transition>,
    pub overall_adaptation_score: f64,
    pub average_adaptation_latency: f64,
    pub meta_resilience_rating: ResilienceRating,
    pub peak_performance_patches: Vec<PatchVersion>,
    pub struggle_patches: Vec<PatchVersion>,
    pub insights: Vec<String>,
    pub adaptation_periods: Vec<AdaptationPeriod>,
}

impl AdaptationReport {
    /// Canonical neutral report returned for thin or unusable history.
    pub fn empty(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            adaptation_metrics: Vec::new(),
            transitions: Vec::new(),
            overall_adaptation_score: 0.0,
            average_adaptation_latency: 0.0,
            meta_resilience_rating: ResilienceRating::Unknown,
            peak_performance_patches: Vec::new(),
            struggle_patches: Vec::new(),
            insights: Vec::new(),
            adaptation_periods: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adaptation_metrics.is_empty() && self.meta_resilience_rating == ResilienceRating::Unknown
    }
}

pub(crate) fn patch_metrics(records: &[PatchRecord], transitions: &[Transition]) -> Vec<PatchMetric> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let incoming = i.checked_sub(1).and_then(|t| transitions.get(t));
            PatchMetric {
                patch_version: rec.patch_version,
                patch_date: rec.patch_date,
                games_played: rec.games_played,
                win_rate: rec.win_rate,
                adaptation_speed: incoming.map_or(0, |t| t.adaptation_games),
                performance_delta: incoming.map_or(0.0, |t| t.performance_delta),
                key_changes: rec.major_changes.clone(),
            }
        })
        .collect()
}

/// Up to three patches with the highest win rate; ties keep history order.
pub(crate) fn peak_patches(records: &[PatchRecord]) -> Vec<PatchVersion> {
    let mut sorted: Vec<&PatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    sorted.into_iter().take(3).map(|r| r.patch_version).collect()
}

/// Up to three patches with the lowest win rate; ties keep history order.
pub(crate) fn struggle_patches(records: &[PatchRecord]) -> Vec<PatchVersion> {
    let mut sorted: Vec<&PatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.win_rate.total_cmp(&b.win_rate));
    sorted.into_iter().take(3).map(|r| r.patch_version).collect()
}

pub(crate) fn insights(transitions: &[Transition], latency: f64, score: f64) -> Vec<String> {
    let mut out = Vec::with_capacity(3);

    if latency < 1.5 {
        out.push(format!(
            "You adapt to meta changes quickly, averaging {:.1} patches to stabilize",
            latency
        ));
    } else if latency < 2.5 {
        out.push(format!(
            "Your adaptation speed is moderate at {:.1} patches per transition",
            latency
        ));
    } else {
        out.push(format!(
            "You take {:.1} patches to adapt - consider tracking patch notes more closely",
            latency
        ));
    }

    let recent = &transitions[transitions.len().saturating_sub(3)..];
    let positive_recent = recent.iter().filter(|t| t.kind == TransitionKind::Positive).count();
    if positive_recent as f64 > recent.len() as f64 / 2.0 {
        out.push("You are on an upward trajectory in recent patches".to_string());
    } else {
        out.push("Recent patches have been challenging - review your champion pool".to_string());
    }

    if score > 0.7 {
        out.push("You demonstrate excellent meta adaptation skills".to_string());
    } else if score > 0.5 {
        out.push("Your adaptation is solid but has room for improvement".to_string());
    } else {
        out.push("Focus on faster adaptation by diversifying your strategy".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_buckets() {
        assert_eq!(ResilienceRating::from_score(0.8), ResilienceRating::Excellent);
        assert_eq!(ResilienceRating::from_score(0.79), ResilienceRating::Good);
        assert_eq!(ResilienceRating::from_score(0.65), ResilienceRating::Good);
        assert_eq!(ResilienceRating::from_score(0.5), ResilienceRating::Moderate);
        assert_eq!(ResilienceRating::from_score(0.49), ResilienceRating::NeedsImprovement);
    }

    #[test]
    fn test_rating_serializes_display_text() {
        let json = serde_json::to_string(&ResilienceRating::NeedsImprovement).unwrap();
        assert_eq!(json, "\"Needs Improvement\"");
        assert_eq!(ResilienceRating::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_peak_and_struggle_ties_keep_first_seen() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rates = [0.5, 0.6, 0.5, 0.6, 0.4];
        let records: Vec<PatchRecord> = rates
            .iter()
            .enumerate()
            .map(|(i, wr)| PatchRecord::new(PatchVersion::new(14, i as u16), day, 10, *wr))
            .collect();

        let peaks: Vec<u16> = peak_patches(&records).iter().map(|p| p.minor).collect();
        assert_eq!(peaks, vec![1, 3, 0]);

        let struggles: Vec<u16> = struggle_patches(&records).iter().map(|p| p.minor).collect();
        assert_eq!(struggles, vec![4, 0, 2]);
    }
}
