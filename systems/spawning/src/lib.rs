#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that turns attack plans into wave rosters.

use std::collections::BTreeMap;

use adaptive_defence_core::{AttackPlan, Command, EnemyPath, EnemySpawn, WavePhase};
use adaptive_defence_system_pathing::compute_path;

/// Pure system that emits the `LaunchWave` command for an accepted plan.
#[derive(Debug, Default)]
pub struct Spawning {
    paths: BTreeMap<u32, EnemyPath>,
}

impl Spawning {
    /// Creates a new spawning system with an empty path cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `Command::LaunchWave` for the plan while a plan is awaited.
    ///
    /// Every enemy of the wave shares the same path and starts with the hit
    /// points the tier prescribes for `round`.
    pub fn handle(
        &mut self,
        phase: WavePhase,
        plan: AttackPlan,
        round: u32,
        out: &mut Vec<Command>,
    ) {
        if phase != WavePhase::RequestingPlan {
            return;
        }

        let path = self.path_for(plan.spawn_row());
        let tier = plan.tier();
        let enemies = (0..tier.enemy_count())
            .map(|_| EnemySpawn {
                hit_points: tier.hit_points(round),
                path: path.clone(),
            })
            .collect();

        out.push(Command::LaunchWave { plan, enemies });
    }

    fn path_for(&mut self, spawn_row: u32) -> EnemyPath {
        self.paths
            .entry(spawn_row)
            .or_insert_with(|| compute_path(spawn_row))
            .clone()
    }
}
