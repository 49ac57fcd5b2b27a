//! Local opponent used when no AI service is reachable.

use std::{
    future::{self, Future},
    sync::{Mutex, PoisonError},
};

use adaptive_defence_core::{AttackPlan, Outcome, PlanRequest, WaveTier, GRID_SIZE};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{AttackAdvisor, GatewayError};

const MIN_EXPLORATION: f64 = 0.3;
const EXPLORATION_DECAY_PER_ROUND: f64 = 0.05;

const TAUNTS: [&str; 4] = [
    "Your defense is weak at row {row}!",
    "Nice try, but I see an opening at row {row}.",
    "Impressive defense, but I\u{2019}m getting stronger!",
    "You\u{2019}re doing great, but I will adapt soon.",
];

/// Opponent that probes the least defended row and explores less as rounds pass.
#[derive(Debug)]
pub struct OfflineAdvisor {
    rng: Mutex<ChaCha8Rng>,
}

impl OfflineAdvisor {
    /// Creates an advisor whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn plan(&self, request: &PlanRequest) -> Option<AttackPlan> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if rng.gen_bool(exploration_rate(request.round)) {
            let tier = *WaveTier::ALL.choose(&mut *rng)?;
            AttackPlan::new(rng.gen_range(0..GRID_SIZE), tier)
        } else {
            AttackPlan::new(weakest_row(request), WaveTier::Normal)
        }
    }

    fn taunt(&self, outcome: &Outcome) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let template = TAUNTS.choose(&mut *rng).copied().unwrap_or(TAUNTS[0]);
        template.replace("{row}", &outcome.attack_row.to_string())
    }
}

impl AttackAdvisor for OfflineAdvisor {
    fn request_plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<AttackPlan, GatewayError>> + Send {
        let round = i64::from(request.round);
        future::ready(self.plan(request).ok_or(GatewayError::InvalidPlan {
            attack_row: -1,
            wave_type: round,
        }))
    }

    fn report_outcome(
        &self,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send {
        future::ready(Ok(self.taunt(outcome)))
    }

    fn request_training(&self) {}
}

fn exploration_rate(round: u32) -> f64 {
    (1.0 - f64::from(round) * EXPLORATION_DECAY_PER_ROUND).max(MIN_EXPLORATION)
}

/// Row holding the fewest towers, preferring the lowest index on ties.
fn weakest_row(request: &PlanRequest) -> u32 {
    let mut counts = [0_u32; GRID_SIZE as usize];
    for cell in &request.towers {
        if let Some(count) = counts.get_mut(cell.row() as usize) {
            *count += 1;
        }
    }
    (0..GRID_SIZE)
        .min_by_key(|row| counts[*row as usize])
        .unwrap_or(0)
}
