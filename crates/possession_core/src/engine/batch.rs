//! Parallel batch resolution
//!
//! Runs many independent phases from the same snapshot. Phase `i` uses its
//! own `ChaCha8Rng` seeded with `base_seed + i`, so the output does not
//! depend on how rayon schedules the work.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::graph::PossessionGraph;
use super::outcome::{PhaseOutcome, Termination};
use super::player::PlayerId;
use super::resolver::PhaseResolver;
use super::tactics::TacticalAttributes;
use crate::error::Result;

/// Generator for phase `index` of a batch
pub fn phase_rng(base_seed: u64, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(index))
}

/// Resolve `count` phases in parallel, returned in index order
pub fn resolve_batch<A>(
    resolver: &PhaseResolver,
    graph: &PossessionGraph,
    attributes: &A,
    possessor: PlayerId,
    base_seed: u64,
    count: u64,
) -> Result<Vec<PhaseOutcome>>
where
    A: TacticalAttributes + Sync + ?Sized,
{
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = phase_rng(base_seed, i);
            resolver.resolve(possessor, graph, attributes, &mut rng)
        })
        .collect()
}

/// Aggregate statistics over a set of outcomes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phases: u64,
    pub chances: u64,
    pub goals: u64,
    pub passes: u64,
    pub restarts: u64,
    /// Keyed by `Termination::as_str`
    pub terminations: BTreeMap<String, u64>,
    pub mean_route_length: f64,
    pub mean_iterations: f64,
    pub top_scorer: Option<PlayerId>,
}

impl PhaseSummary {
    pub fn from_outcomes(outcomes: &[PhaseOutcome]) -> Self {
        let mut summary = PhaseSummary {
            terminations: Termination::ALL.iter().map(|t| (t.as_str().to_string(), 0)).collect(),
            ..PhaseSummary::default()
        };

        if outcomes.is_empty() {
            return summary;
        }

        let mut scorers: BTreeMap<PlayerId, u64> = BTreeMap::new();
        let mut route_total = 0u64;
        let mut iteration_total = 0u64;

        for outcome in outcomes {
            summary.phases += 1;
            summary.chances += u64::from(outcome.chances);
            summary.goals += u64::from(outcome.goals);
            summary.passes += u64::from(outcome.passes);
            summary.restarts += u64::from(outcome.restarts);
            *summary.terminations.entry(outcome.termination.as_str().to_string()).or_insert(0) += 1;
            route_total += outcome.route.len() as u64;
            iteration_total += u64::from(outcome.iterations);

            if let Some(scorer) = outcome.scorer {
                *scorers.entry(scorer).or_insert(0) += 1;
            }
        }

        summary.mean_route_length = route_total as f64 / summary.phases as f64;
        summary.mean_iterations = iteration_total as f64 / summary.phases as f64;
        // most goals, then lowest id
        summary.top_scorer = scorers
            .into_iter()
            .fold(None, |best: Option<(PlayerId, u64)>, (id, goals)| match best {
                Some(b) if b.1 >= goals => Some(b),
                _ => Some((id, goals)),
            })
            .map(|(id, _)| id);

        summary
    }

    pub fn count(&self, termination: Termination) -> u64 {
        self.terminations.get(termination.as_str()).copied().unwrap_or(0)
    }

    pub fn conversion_rate(&self) -> f64 {
        if self.chances == 0 {
            0.0
        } else {
            self.goals as f64 / self.chances as f64
        }
    }
}
