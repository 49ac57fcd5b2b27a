#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns a completed wave into the report sent to the AI.

use adaptive_defence_core::{
    action_index, BoardSnapshot, EnemyStatus, EnemyView, Event, Outcome, Reward, TowerView,
    WaveTier,
};

/// Feedback system that composes one [`Outcome`] per completed wave.
#[derive(Debug, Default)]
pub struct Feedback {
    reports: u32,
}

impl Feedback {
    /// Creates a new feedback system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outcomes composed so far.
    #[must_use]
    pub const fn reports(&self) -> u32 {
        self.reports
    }

    /// Pushes an outcome for every `Event::WaveCompleted` in `events`.
    ///
    /// The views must describe the world right after the events were applied.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        towers: &TowerView,
        out: &mut Vec<Outcome>,
    ) {
        for event in events {
            if matches!(event, Event::WaveCompleted { .. }) {
                self.reports = self.reports.saturating_add(1);
                out.push(compose_outcome(enemies, towers));
            }
        }
    }
}

/// Builds the report for the wave described by `enemies`.
///
/// The reward favours the AI whenever a single enemy reached the base. The
/// action is reconstructed from the roster: the spawn row of the first enemy
/// and the tier implied by the number of enemies.
#[must_use]
pub fn compose_outcome(enemies: &EnemyView, towers: &TowerView) -> Outcome {
    let reward = if enemies
        .iter()
        .any(|enemy| enemy.status == EnemyStatus::Breached)
    {
        Reward::BaseBreached
    } else {
        Reward::Repelled
    };

    let attack_row = enemies
        .iter()
        .next()
        .and_then(|enemy| enemy.path.spawn())
        .map_or(0, |cell| cell.row());
    let tier_index = inferred_tier_index(enemies.len());
    let board = BoardSnapshot::capture(towers);

    Outcome {
        reward,
        state: board.clone(),
        action_index: action_index(attack_row, tier_index),
        next_state: board,
        done: true,
        attack_row,
    }
}

fn inferred_tier_index(enemy_count: usize) -> u32 {
    let count = u32::try_from(enemy_count).unwrap_or(u32::MAX);
    let weakest = WaveTier::Weak.enemy_count();
    let per_tier = WaveTier::Normal.enemy_count() - weakest;
    count.saturating_sub(weakest) / per_tier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_index_follows_roster_size() {
        for tier in WaveTier::ALL {
            let count = tier.enemy_count() as usize;
            assert_eq!(inferred_tier_index(count), tier.index());
        }
        assert_eq!(inferred_tier_index(0), 0);
    }

    #[test]
    fn empty_wave_is_repelled_on_row_zero() {
        let outcome = compose_outcome(&EnemyView::default(), &TowerView::default());
        assert_eq!(outcome.reward, Reward::Repelled);
        assert_eq!(outcome.attack_row, 0);
        assert_eq!(outcome.action_index, 0);
        assert!(outcome.done);
    }

    #[test]
    fn ignores_events_other_than_completion() {
        let mut feedback = Feedback::new();
        let mut out = Vec::new();
        feedback.handle(
            &[Event::UpgradePurchased],
            &EnemyView::default(),
            &TowerView::default(),
            &mut out,
        );
        assert!(out.is_empty());
        assert_eq!(feedback.reports(), 0);
    }
}
