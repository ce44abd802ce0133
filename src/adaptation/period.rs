use serde::{Deserialize, Serialize};

use super::transition::{Transition, TransitionKind};

/// Maximal run of consecutive transitions sharing one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationPeriod {
    pub kind: TransitionKind,
    pub duration: usize,
    pub transitions: Vec<Transition>,
}

/// Split the transition sequence into same-kind runs, in order.
pub fn identify_periods(transitions: &[Transition]) -> Vec<AdaptationPeriod> {
    transitions
        .chunk_by(|a, b| a.kind == b.kind)
        .map(|run| AdaptationPeriod {
            kind: run[0].kind,
            duration: run.len(),
            transitions: run.to_vec(),
        })
        .collect()
}

/// Mean number of patches needed to recover from a negative run.
///
/// A recovered run costs its length plus the recovering patch; a run still
/// open at the end of history costs only its length. No negatives at all
/// yields the 1.0 baseline, no transitions yields 0.0.
pub fn adaptation_latency(transitions: &[Transition]) -> f64 {
    if transitions.is_empty() {
        return 0.0;
    }

    let periods = identify_periods(transitions);
    let last = periods.len() - 1;
    let recovery_times: Vec<usize> = periods
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind == TransitionKind::Negative)
        .map(|(i, p)| if i < last { p.duration + 1 } else { p.duration })
        .collect();

    if recovery_times.is_empty() {
        return 1.0;
    }
    recovery_times.iter().sum::<usize>() as f64 / recovery_times.len() as f64
}
