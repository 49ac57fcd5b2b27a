#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state and wave resolution for Adaptive Defence.
//!
//! The world owns the economy, the base health, the towers and the enemies of
//! the current wave, along with the phase of the wave lifecycle. It mutates
//! only through [`apply`] and reports every observable change as an
//! [`Event`]. Requests that are not allowed in the current state are ignored
//! and reported through rejection events rather than errors.

mod towers;

use adaptive_defence_core::{
    AttackPlan, CellCoord, Command, EnemyId, EnemyPath, EnemySnapshot, EnemySpawn, EnemyStatus,
    Event, PlacementError, Strike, UpgradeError, WavePhase, WaveRejection, BASE_CELL,
    BREACH_PENALTY, KILL_BOUNTY, PREPARING_ATTACK_MESSAGE, STARTING_HEALTH, STARTING_MONEY,
    TOWER_COST, UPGRADE_COST, UPGRADE_MESSAGE, WELCOME_BANNER,
};

use towers::TowerRegistry;

/// Represents the authoritative Adaptive Defence game state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    health: i32,
    money: u32,
    towers: TowerRegistry,
    towers_upgraded: bool,
    placing_towers: bool,
    round: u32,
    wave_progress: u32,
    enemies: Vec<Enemy>,
    message: String,
    phase: WavePhase,
}

impl World {
    /// Creates a new world with starting health, money and an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            health: STARTING_HEALTH,
            money: STARTING_MONEY,
            towers: TowerRegistry::new(),
            towers_upgraded: false,
            placing_towers: false,
            round: 1,
            wave_progress: 0,
            enemies: Vec::new(),
            message: String::new(),
            phase: WavePhase::Idle,
        }
    }

    fn set_phase(&mut self, phase: WavePhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn set_message(&mut self, message: String, out_events: &mut Vec<Event>) {
        self.message.clone_from(&message);
        out_events.push(Event::MessageChanged { message });
    }

    fn place_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let rejection = if !cell.is_within_grid() {
            Some(PlacementError::OutOfBounds)
        } else if cell == BASE_CELL {
            Some(PlacementError::Base)
        } else if self.towers.is_occupied(cell) {
            Some(PlacementError::Occupied)
        } else if self.money < TOWER_COST {
            Some(PlacementError::InsufficientFunds)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::TowerPlacementRejected { cell, reason });
            return;
        }

        self.money -= TOWER_COST;
        let tower = self.towers.insert(cell);
        out_events.push(Event::TowerPlaced { tower, cell });
    }

    fn purchase_upgrade(&mut self, out_events: &mut Vec<Event>) {
        if self.towers.is_empty() {
            out_events.push(Event::UpgradeRejected {
                reason: UpgradeError::NoTowers,
            });
            return;
        }
        if self.money < UPGRADE_COST {
            out_events.push(Event::UpgradeRejected {
                reason: UpgradeError::InsufficientFunds,
            });
            return;
        }

        self.money -= UPGRADE_COST;
        self.towers_upgraded = true;
        out_events.push(Event::UpgradePurchased);
        self.set_message(UPGRADE_MESSAGE.to_owned(), out_events);
    }

    fn begin_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.phase.is_wave_in_progress() {
            out_events.push(Event::WaveRejected {
                reason: WaveRejection::WaveInProgress,
            });
            return;
        }
        if self.health <= 0 {
            out_events.push(Event::WaveRejected {
                reason: WaveRejection::BaseDestroyed,
            });
            return;
        }

        self.set_phase(WavePhase::RequestingPlan, out_events);
        self.set_message(PREPARING_ATTACK_MESSAGE.to_owned(), out_events);
        out_events.push(Event::PlanRequested { round: self.round });
    }

    fn launch_wave(
        &mut self,
        plan: AttackPlan,
        enemies: Vec<EnemySpawn>,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase != WavePhase::RequestingPlan {
            return;
        }

        self.enemies = enemies
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| {
                let id = EnemyId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Enemy::from_spawn(id, spawn)
            })
            .collect();
        let count = u32::try_from(self.enemies.len()).unwrap_or(u32::MAX);
        self.wave_progress = count;

        self.set_phase(WavePhase::Running, out_events);
        out_events.push(Event::WaveLaunched {
            plan,
            enemies: count,
        });
    }

    fn resolve_tick(&mut self, strikes: &[Strike], out_events: &mut Vec<Event>) {
        if self.phase != WavePhase::Running {
            return;
        }

        for enemy in self.enemies.iter_mut() {
            if !enemy.is_active() {
                continue;
            }

            let damage = strikes
                .iter()
                .filter(|strike| strike.enemy == enemy.id)
                .fold(0u32, |total, strike| total.saturating_add(strike.damage));
            if damage > 0 {
                let damage_points = i32::try_from(damage).unwrap_or(i32::MAX);
                enemy.hit_points = enemy.hit_points.saturating_sub(damage_points);
                out_events.push(Event::EnemyDamaged {
                    enemy: enemy.id,
                    damage,
                    remaining: enemy.hit_points,
                });
            }

            if enemy.hit_points <= 0 {
                enemy.status = EnemyStatus::Killed;
                self.wave_progress = self.wave_progress.saturating_sub(1);
                out_events.push(Event::EnemyKilled { enemy: enemy.id });
                continue;
            }

            let from = enemy.cell();
            enemy.path_index += 1;
            out_events.push(Event::EnemyAdvanced {
                enemy: enemy.id,
                from,
                to: enemy.cell(),
            });

            if enemy.path_index == enemy.path.final_index() {
                self.health -= BREACH_PENALTY;
                enemy.status = EnemyStatus::Breached;
                self.wave_progress = self.wave_progress.saturating_sub(1);
                out_events.push(Event::BaseBreached {
                    enemy: enemy.id,
                    health: self.health,
                });
            }
        }

        if self.enemies.iter().all(|enemy| !enemy.is_active()) {
            self.complete_wave(out_events);
        }
    }

    fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        let kills = self.count_status(EnemyStatus::Killed);
        let breaches = self.count_status(EnemyStatus::Breached);
        let finished = self.round;

        self.round = self.round.saturating_add(1);
        self.wave_progress = 0;
        self.money = self.money.saturating_add(kills.saturating_mul(KILL_BOUNTY));

        out_events.push(Event::WaveCompleted {
            round: finished,
            kills,
            breaches,
        });
        self.set_phase(WavePhase::Reporting, out_events);
    }

    fn count_status(&self, status: EnemyStatus) -> u32 {
        let count = self
            .enemies
            .iter()
            .filter(|enemy| enemy.status == status)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::TogglePlacementMode => {
            world.placing_towers = !world.placing_towers;
            out_events.push(Event::PlacementModeChanged {
                enabled: world.placing_towers,
            });
        }
        Command::SelectCell { cell } => {
            if world.placing_towers {
                world.place_tower(cell, out_events);
            }
        }
        Command::PlaceTower { cell } => world.place_tower(cell, out_events),
        Command::PurchaseUpgrade => world.purchase_upgrade(out_events),
        Command::BeginWave => world.begin_wave(out_events),
        Command::AbortWave { message } => {
            if world.phase == WavePhase::RequestingPlan {
                world.set_message(message, out_events);
                out_events.push(Event::WaveAborted);
                world.set_phase(WavePhase::Idle, out_events);
            }
        }
        Command::LaunchWave { plan, enemies } => world.launch_wave(plan, enemies, out_events),
        Command::ResolveTick { strikes } => world.resolve_tick(&strikes, out_events),
        Command::FinishReport { message } => {
            if world.phase == WavePhase::Reporting {
                world.set_message(message, out_events);
                world.set_phase(WavePhase::Idle, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use adaptive_defence_core::{EnemyView, PlanRequest, TowerView, WavePhase};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current base health. May be negative.
    #[must_use]
    pub fn health(world: &World) -> i32 {
        world.health
    }

    /// Money available to the player.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Round the next wave is played in.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Enemies of the current wave that have not been resolved yet.
    #[must_use]
    pub fn wave_progress(world: &World) -> u32 {
        world.wave_progress
    }

    /// Current phase of the wave lifecycle.
    #[must_use]
    pub fn phase(world: &World) -> WavePhase {
        world.phase
    }

    /// Latest message shown to the player.
    #[must_use]
    pub fn message(world: &World) -> &str {
        &world.message
    }

    /// Reports whether the shared tower upgrade has been purchased.
    #[must_use]
    pub fn towers_upgraded(world: &World) -> bool {
        world.towers_upgraded
    }

    /// Reports whether cell selections currently place towers.
    #[must_use]
    pub fn placing_towers(world: &World) -> bool {
        world.placing_towers
    }

    /// Reports whether the base has run out of health.
    #[must_use]
    pub fn is_defeated(world: &World) -> bool {
        world.health <= 0
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        world.towers.view()
    }

    /// Captures a read-only view of the enemies of the current or last wave.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Builds the input the AI needs to plan the next wave.
    #[must_use]
    pub fn plan_request(world: &World) -> PlanRequest {
        PlanRequest {
            towers: world.towers.view().cells(),
            round: world.round,
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    hit_points: i32,
    path: EnemyPath,
    path_index: usize,
    status: EnemyStatus,
}

impl Enemy {
    fn from_spawn(id: EnemyId, spawn: EnemySpawn) -> Self {
        Self {
            id,
            hit_points: spawn.hit_points,
            path: spawn.path,
            path_index: 0,
            status: EnemyStatus::Advancing,
        }
    }

    fn is_active(&self) -> bool {
        !self.status.is_dead() && self.path_index < self.path.len()
    }

    fn cell(&self) -> CellCoord {
        self.path
            .cell(self.path_index)
            .or_else(|| self.path.cell(self.path.final_index()))
            .unwrap_or(BASE_CELL)
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            cell: self.cell(),
            hit_points: self.hit_points,
            path_index: self.path_index,
            path: self.path.clone(),
            status: self.status,
        }
    }
}
