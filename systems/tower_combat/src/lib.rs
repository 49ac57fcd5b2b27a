#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower damage for every advancing enemy.

use adaptive_defence_core::{
    CellCoord, Command, EnemyView, Strike, TowerView, WavePhase, TOWER_REACH,
};

/// Damage a tower deals per tick before the upgrade is purchased.
pub const STANDARD_DAMAGE: u32 = 8;

/// Damage a tower deals per tick once the upgrade is purchased.
pub const UPGRADED_DAMAGE: u32 = 16;

/// Returns the damage a single tower deals per tick.
#[must_use]
pub const fn tower_damage(upgraded: bool) -> u32 {
    if upgraded {
        UPGRADED_DAMAGE
    } else {
        STANDARD_DAMAGE
    }
}

/// Sums the damage dealt to an enemy standing on `cell` this tick.
///
/// Every tower within Manhattan distance [`TOWER_REACH`] contributes the same
/// per-tower damage, selected by the global upgrade flag.
#[must_use]
pub fn damage_at(towers: &TowerView, upgraded: bool, cell: CellCoord) -> u32 {
    let per_tower = tower_damage(upgraded);
    towers
        .iter()
        .filter(|tower| tower.cell.manhattan_distance(cell) <= TOWER_REACH)
        .fold(0u32, |total, _| total.saturating_add(per_tower))
}

/// Tower combat system that queues the strikes of a single tick.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Strike>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `Command::ResolveTick` carrying the strikes for every active enemy.
    ///
    /// Nothing is emitted outside the running phase. Enemies out of reach are
    /// omitted from the strike list but the tick command is still emitted so
    /// the world advances them.
    pub fn handle(
        &mut self,
        phase: WavePhase,
        enemies: &EnemyView,
        towers: &TowerView,
        upgraded: bool,
        out: &mut Vec<Command>,
    ) {
        if phase != WavePhase::Running {
            return;
        }

        self.scratch.clear();

        for enemy in enemies.iter().filter(|enemy| enemy.is_active()) {
            let damage = damage_at(towers, upgraded, enemy.cell);
            if damage > 0 {
                self.scratch.push(Strike {
                    enemy: enemy.id,
                    damage,
                });
            }
        }

        out.push(Command::ResolveTick {
            strikes: self.scratch.drain(..).collect(),
        });
    }
}
