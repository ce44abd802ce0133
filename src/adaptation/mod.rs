//! Adaptation Module
//!
//! Segments a player's patch-over-patch performance into transitions and
//! adaptation periods, then scores how quickly they recover from balance
//! shifts.

mod period;
mod report;
mod transition;

pub use period::{adaptation_latency, identify_periods, AdaptationPeriod};
pub use report::{AdaptationReport, PatchMetric, ResilienceRating};
pub use transition::{derive_transitions, estimate_adaptation_games, Transition, TransitionKind};

use tracing::{debug, error, warn};

use crate::error::{EngineError, Result};
use crate::patch::PatchRecord;

/// Fewer records than this produce the neutral empty report.
pub const MIN_PATCH_RECORDS: usize = 3;

/// Adaptation-games ceiling; a player always needing it scores 0 on speed.
const MAX_ADAPTATION_GAMES: f64 = 30.0;

/// Stateless analyzer over one player's patch history.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptationAnalyzer;

impl AdaptationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a player's history. Never fails: thin history and internal
    /// errors both come back as [`AdaptationReport::empty`].
    pub fn analyze(&self, player_id: &str, records: &[PatchRecord]) -> AdaptationReport {
        match self.try_analyze(player_id, records) {
            Ok(report) => report,
            Err(EngineError::InsufficientRecords { found, .. }) => {
                warn!(player_id, found, "Insufficient patch data");
                AdaptationReport::empty(player_id)
            }
            Err(e) => {
                error!(player_id, "Adaptation calculation failed: {}", e);
                AdaptationReport::empty(player_id)
            }
        }
    }

    pub fn try_analyze(&self, player_id: &str, records: &[PatchRecord]) -> Result<AdaptationReport> {
        if records.len() < MIN_PATCH_RECORDS {
            return Err(EngineError::InsufficientRecords {
                found: records.len(),
                required: MIN_PATCH_RECORDS,
            });
        }
        for rec in records {
            rec.validate()?;
        }

        let mut ordered = records.to_vec();
        ordered.sort_by_key(|r| r.patch_version);

        let transitions = derive_transitions(&ordered);
        let latency = adaptation_latency(&transitions);
        let periods = identify_periods(&transitions);
        let score = overall_adaptation_score(&transitions);

        debug!(
            player_id,
            transitions = transitions.len(),
            periods = periods.len(),
            score,
            "Calculated adaptation metrics"
        );

        Ok(AdaptationReport {
            player_id: player_id.to_string(),
            adaptation_metrics: report::patch_metrics(&ordered, &transitions),
            insights: report::insights(&transitions, latency, score),
            overall_adaptation_score: score,
            average_adaptation_latency: latency,
            meta_resilience_rating: ResilienceRating::from_score(score),
            peak_performance_patches: report::peak_patches(&ordered),
            struggle_patches: report::struggle_patches(&ordered),
            adaptation_periods: periods,
            transitions,
        })
    }
}

/// `0.6 * positive_ratio + 0.4 * speed`, rounded to two decimals.
pub fn overall_adaptation_score(transitions: &[Transition]) -> f64 {
    if transitions.is_empty() {
        return 0.5;
    }
    let n = transitions.len() as f64;
    let positive = transitions.iter().filter(|t| t.kind == TransitionKind::Positive).count() as f64;
    let avg_games = transitions.iter().map(|t| f64::from(t.adaptation_games)).sum::<f64>() / n;
    let speed = (1.0 - avg_games / MAX_ADAPTATION_GAMES).max(0.0);

    let score = (positive / n) * 0.6 + speed * 0.4;
    (score * 100.0).round() / 100.0
}
