//! Chemistry Module
//!
//! Reads the synergy model's per-edge scores as team chemistry: the pairs
//! that click, the pairs that grind, and an overall grade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edges scoring above this are strong pairs.
pub const STRONG_THRESHOLD: f64 = 0.7;
/// Edges scoring below this are friction zones.
pub const FRICTION_THRESHOLD: f64 = 0.4;
const MAX_STRONG_PAIRS: usize = 10;
const MAX_FRICTION_ZONES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChemistryType {
    Strong,
    Friction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryPair {
    pub player_a: String,
    pub player_b: String,
    pub synergy_score: f64,
    pub chemistry_type: ChemistryType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChemistryGrade {
    Excellent,
    Good,
    Moderate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ChemistryGrade {
    /// Bucket a mean synergy score; every bound is exclusive.
    pub fn from_mean(mean: f64) -> Self {
        if mean > 0.7 {
            Self::Excellent
        } else if mean > 0.6 {
            Self::Good
        } else if mean > 0.5 {
            Self::Moderate
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ChemistryGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryRatings {
    pub overall_rating: ChemistryGrade,
    pub mean_synergy: f64,
    /// Population standard deviation.
    pub std_synergy: f64,
    pub high_synergy_pairs: usize,
    pub low_synergy_pairs: usize,
}

impl ChemistryRatings {
    /// `None` for an empty score list.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            overall_rating: ChemistryGrade::from_mean(mean),
            mean_synergy: mean,
            std_synergy: variance.sqrt(),
            high_synergy_pairs: scores.iter().filter(|&&s| s > STRONG_THRESHOLD).count(),
            low_synergy_pairs: scores.iter().filter(|&&s| s < FRICTION_THRESHOLD).count(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_version: Option<String>,
    /// One score per co-play edge, in edge order.
    pub synergy_scores: Vec<f64>,
    pub strong_pairs: Vec<ChemistryPair>,
    pub friction_zones: Vec<ChemistryPair>,
    pub chemistry_ratings: Option<ChemistryRatings>,
    pub average_synergy: f64,
}

impl ChemistryReport {
    /// Neutral report for a graph without usable edges.
    pub fn empty() -> Self {
        Self {
            patch_version: None,
            synergy_scores: Vec::new(),
            strong_pairs: Vec::new(),
            friction_zones: Vec::new(),
            chemistry_ratings: None,
            average_synergy: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.synergy_scores.is_empty()
    }
}

/// Build the report from `(player_a, player_b)` edges and their scores.
/// Edges beyond the end of `scores` are ignored.
pub fn analyze_chemistry(edges: &[(String, String)], scores: &[f64], patch_version: Option<&str>) -> ChemistryReport {
    let scores = &scores[..scores.len().min(edges.len())];
    let Some(ratings) = ChemistryRatings::from_scores(scores) else {
        return ChemistryReport::empty();
    };

    let pairs = |kind: ChemistryType, keep: fn(f64) -> bool| -> Vec<ChemistryPair> {
        edges
            .iter()
            .zip(scores)
            .filter(|&(_, &s)| keep(s))
            .map(|((a, b), &s)| ChemistryPair {
                player_a: a.clone(),
                player_b: b.clone(),
                synergy_score: s,
                chemistry_type: kind,
            })
            .collect()
    };

    let mut strong_pairs = pairs(ChemistryType::Strong, |s| s > STRONG_THRESHOLD);
    strong_pairs.sort_by(|a, b| b.synergy_score.total_cmp(&a.synergy_score));
    strong_pairs.truncate(MAX_STRONG_PAIRS);

    let mut friction_zones = pairs(ChemistryType::Friction, |s| s < FRICTION_THRESHOLD);
    friction_zones.sort_by(|a, b| a.synergy_score.total_cmp(&b.synergy_score));
    friction_zones.truncate(MAX_FRICTION_ZONES);

    ChemistryReport {
        patch_version: patch_version.map(str::to_string),
        synergy_scores: scores.to_vec(),
        strong_pairs,
        friction_zones,
        average_synergy: ratings.mean_synergy,
        chemistry_ratings: Some(ratings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(n: usize) -> Vec<(String, String)> {
        (0..n).map(|i| (format!("p{}", i), format!("p{}", i + 1))).collect()
    }

    #[test]
    fn test_thresholds_are_strict() {
        let report = analyze_chemistry(&edges(4), &[0.7, 0.71, 0.4, 0.39], None);
        assert_eq!(report.strong_pairs.len(), 1);
        assert_eq!(report.strong_pairs[0].synergy_score, 0.71);
        assert_eq!(report.friction_zones.len(), 1);
        assert_eq!(report.friction_zones[0].synergy_score, 0.39);
        assert_eq!(report.friction_zones[0].chemistry_type, ChemistryType::Friction);

        let ratings = report.chemistry_ratings.unwrap();
        assert_eq!(ratings.high_synergy_pairs, 1);
        assert_eq!(ratings.low_synergy_pairs, 1);
    }

    #[test]
    fn test_strong_pairs_sorted_and_capped() {
        let scores: Vec<f64> = (0..12).map(|i| 0.75 + f64::from(i) * 0.01).collect();
        let report = analyze_chemistry(&edges(12), &scores, Some("14.21"));

        assert_eq!(report.strong_pairs.len(), 10);
        assert_eq!(report.strong_pairs[0].player_a, "p11");
        assert!(report
            .strong_pairs
            .windows(2)
            .all(|w| w[0].synergy_score >= w[1].synergy_score));
        assert_eq!(report.patch_version.as_deref(), Some("14.21"));
    }

    #[test]
    fn test_friction_sorted_ascending_and_capped() {
        let scores = [0.3, 0.1, 0.35, 0.2, 0.05, 0.15, 0.25];
        let report = analyze_chemistry(&edges(7), &scores, None);

        let got: Vec<f64> = report.friction_zones.iter().map(|p| p.synergy_score).collect();
        assert_eq!(got, vec![0.05, 0.1, 0.15, 0.2, 0.25]);
    }

    #[test]
    fn test_grade_buckets() {
        assert_eq!(ChemistryGrade::from_mean(0.71), ChemistryGrade::Excellent);
        assert_eq!(ChemistryGrade::from_mean(0.7), ChemistryGrade::Good);
        assert_eq!(ChemistryGrade::from_mean(0.61), ChemistryGrade::Good);
        assert_eq!(ChemistryGrade::from_mean(0.6), ChemistryGrade::Moderate);
        assert_eq!(ChemistryGrade::from_mean(0.5), ChemistryGrade::NeedsImprovement);
        assert_eq!(ChemistryGrade::NeedsImprovement.to_string(), "Needs Improvement");
    }

    #[test]
    fn test_ratings_statistics() {
        let ratings = ChemistryRatings::from_scores(&[0.2, 0.4, 0.6, 0.8]).unwrap();
        assert!((ratings.mean_synergy - 0.5).abs() < 1e-12);
        // population std of the four points
        assert!((ratings.std_synergy - 0.05f64.sqrt()).abs() < 1e-12);
        assert_eq!(ratings.overall_rating, ChemistryGrade::NeedsImprovement);
    }

    #[test]
    fn test_no_edges_is_empty() {
        assert_eq!(analyze_chemistry(&[], &[], Some("14.21")), ChemistryReport::empty());
        assert!(ChemistryRatings::from_scores(&[]).is_none());
    }
}
