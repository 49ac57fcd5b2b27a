#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Adaptive Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems read immutable views such as [`EnemyView`] and
//! [`TowerView`] and respond exclusively with new commands.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Adaptive Defence.";

/// Number of rows and columns in the square battlefield grid.
pub const GRID_SIZE: u32 = 8;

/// Cell occupied by the defended base.
pub const BASE_CELL: CellCoord = CellCoord::new(GRID_SIZE - 1, GRID_SIZE / 2);

/// Health the base starts each session with.
pub const STARTING_HEALTH: i32 = 100;

/// Money the player starts each session with.
pub const STARTING_MONEY: u32 = 100;

/// Price of a single tower.
pub const TOWER_COST: u32 = 20;

/// Price of the global tower upgrade.
pub const UPGRADE_COST: u32 = 50;

/// Money credited for every enemy killed by towers.
pub const KILL_BOUNTY: u32 = 10;

/// Health removed from the base for every breaching enemy.
pub const BREACH_PENALTY: i32 = 10;

/// Maximum Manhattan distance at which a tower strikes an enemy.
pub const TOWER_REACH: u32 = 1;

/// Message shown while the AI is choosing its next attack.
pub const PREPARING_ATTACK_MESSAGE: &str = "AI is preparing its attack...";

/// Message shown after the tower upgrade is purchased.
pub const UPGRADE_MESSAGE: &str = "Your towers seem stronger now!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Flips the tower placement mode used to interpret cell selections.
    TogglePlacementMode,
    /// Reports that the player selected a grid cell.
    ///
    /// The selection places a tower only while placement mode is enabled.
    SelectCell {
        /// Cell chosen by the player.
        cell: CellCoord,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Cell that should host the tower.
        cell: CellCoord,
    },
    /// Requests purchase of the upgrade shared by every tower.
    PurchaseUpgrade,
    /// Requests that a new wave begins by asking the AI for an attack plan.
    BeginWave,
    /// Abandons the pending plan request and returns the world to idle.
    AbortWave {
        /// Explanation surfaced to the player.
        message: String,
    },
    /// Instantiates the enemies of a wave produced from an attack plan.
    LaunchWave {
        /// Plan the AI returned for this wave.
        plan: AttackPlan,
        /// Enemies to create, in spawn order.
        enemies: Vec<EnemySpawn>,
    },
    /// Resolves a single simulation tick using precomputed tower strikes.
    ResolveTick {
        /// Damage dealt to individual enemies during the tick.
        strikes: Vec<Strike>,
    },
    /// Concludes the outcome report and returns the world to idle.
    FinishReport {
        /// Advisory text returned by the AI or a failure explanation.
        message: String,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that tower placement mode was switched.
    PlacementModeChanged {
        /// Whether cell selections now place towers.
        enabled: bool,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the tower upgrade was purchased.
    UpgradePurchased,
    /// Reports that an upgrade purchase was rejected.
    UpgradeRejected {
        /// Specific reason the purchase failed.
        reason: UpgradeError,
    },
    /// Announces that the wave phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: WavePhase,
    },
    /// Announces that an attack plan must be requested for the given round.
    PlanRequested {
        /// Round the plan is requested for.
        round: u32,
    },
    /// Reports that a wave start request was ignored.
    WaveRejected {
        /// Specific reason the request was ignored.
        reason: WaveRejection,
    },
    /// Confirms that a pending plan request was abandoned.
    WaveAborted,
    /// Confirms that enemies were created for a new wave.
    WaveLaunched {
        /// Plan that produced the wave.
        plan: AttackPlan,
        /// Number of enemies spawned.
        enemies: u32,
    },
    /// Reports that towers struck an enemy.
    EnemyDamaged {
        /// Identifier of the struck enemy.
        enemy: EnemyId,
        /// Damage dealt during the tick.
        damage: u32,
        /// Hit points remaining after the strike.
        remaining: i32,
    },
    /// Reports that an enemy was destroyed by towers.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy advanced along its path.
    EnemyAdvanced {
        /// Identifier of the enemy that advanced.
        enemy: EnemyId,
        /// Cell occupied before moving.
        from: CellCoord,
        /// Cell occupied after moving.
        to: CellCoord,
    },
    /// Reports that an enemy reached the base.
    BaseBreached {
        /// Identifier of the breaching enemy.
        enemy: EnemyId,
        /// Base health after the penalty was applied.
        health: i32,
    },
    /// Announces that every enemy of the wave has been resolved.
    WaveCompleted {
        /// Round that just finished.
        round: u32,
        /// Enemies destroyed by towers.
        kills: u32,
        /// Enemies that reached the base.
        breaches: u32,
    },
    /// Announces that the message shown to the player changed.
    MessageChanged {
        /// New message text.
        message: String,
    },
}

/// Lifecycle of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave is in progress; a new one may be started.
    Idle,
    /// Waiting for the AI to return an attack plan.
    RequestingPlan,
    /// Enemies are advancing and ticks are being resolved.
    Running,
    /// Waiting for the outcome report to be acknowledged.
    Reporting,
}

impl WavePhase {
    /// Reports whether a wave occupies the world in this phase.
    #[must_use]
    pub const fn is_wave_in_progress(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Reports whether the cell lies inside the battlefield grid.
    #[must_use]
    pub const fn is_within_grid(&self) -> bool {
        self.row < GRID_SIZE && self.column < GRID_SIZE
    }

    /// Row-major index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn grid_index(&self) -> Option<usize> {
        if !self.is_within_grid() {
            return None;
        }
        let row = usize::try_from(self.row).ok()?;
        let column = usize::try_from(self.column).ok()?;
        let width = usize::try_from(GRID_SIZE).ok()?;
        Some(row * width + column)
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy, allocated in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Attack intensity chosen by the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaveTier {
    /// Smallest wave with the weakest enemies.
    Weak,
    /// Medium wave.
    Normal,
    /// Largest wave with the toughest enemies.
    Strong,
}

impl WaveTier {
    /// Every tier in ascending intensity.
    pub const ALL: [WaveTier; 3] = [Self::Weak, Self::Normal, Self::Strong];

    /// Resolves the tier encoded by the AI's `wave_type` integer.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Weak),
            1 => Some(Self::Normal),
            2 => Some(Self::Strong),
            _ => None,
        }
    }

    /// Integer encoding shared with the AI.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Weak => 0,
            Self::Normal => 1,
            Self::Strong => 2,
        }
    }

    /// Number of enemies a wave of this tier spawns.
    #[must_use]
    pub const fn enemy_count(self) -> u32 {
        3 + self.index() * 2
    }

    /// Hit points each enemy starts with during the provided round.
    #[must_use]
    pub const fn hit_points(self, round: u32) -> i32 {
        10 + 10 * self.index() as i32 + 2 * round as i32
    }
}

/// Attack plan returned by the AI before a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackPlan {
    spawn_row: u32,
    tier: WaveTier,
}

impl AttackPlan {
    /// Creates a plan, returning `None` when the spawn row lies outside the grid.
    #[must_use]
    pub const fn new(spawn_row: u32, tier: WaveTier) -> Option<Self> {
        if spawn_row < GRID_SIZE {
            Some(Self { spawn_row, tier })
        } else {
            None
        }
    }

    /// Row on the left edge where enemies enter the grid.
    #[must_use]
    pub const fn spawn_row(&self) -> u32 {
        self.spawn_row
    }

    /// Intensity of the wave.
    #[must_use]
    pub const fn tier(&self) -> WaveTier {
        self.tier
    }

    /// Flat index of the plan within the AI's action space.
    #[must_use]
    pub const fn action_index(&self) -> u32 {
        action_index(self.spawn_row, self.tier.index())
    }
}

/// Flattens a spawn row and tier index into the AI's action space.
#[must_use]
pub const fn action_index(spawn_row: u32, tier_index: u32) -> u32 {
    spawn_row * WaveTier::ALL.len() as u32 + tier_index
}

/// Input the AI receives when asked for a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanRequest {
    /// Cells occupied by towers, in placement order.
    pub towers: Vec<CellCoord>,
    /// Round the plan is requested for.
    pub round: u32,
}

/// Ordered route an enemy walks from its spawn cell to the base.
///
/// Paths are shared between all enemies of a wave and never change after
/// creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnemyPath {
    cells: Arc<[CellCoord]>,
}

impl EnemyPath {
    /// Wraps the provided cells into an immutable path.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self {
            cells: cells.into(),
        }
    }

    /// Cells that compose the path.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the last cell, where an enemy breaches the base.
    #[must_use]
    pub fn final_index(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Cell at the provided index, if any.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// First cell of the path.
    #[must_use]
    pub fn spawn(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }
}

/// Blueprint describing a single enemy of a wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    /// Hit points the enemy starts with.
    pub hit_points: i32,
    /// Route the enemy walks.
    pub path: EnemyPath,
}

/// Damage dealt to one enemy during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Strike {
    /// Enemy receiving the damage.
    pub enemy: EnemyId,
    /// Total damage from every tower in reach.
    pub damage: u32,
}

/// Terminal state of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyStatus {
    /// The enemy is still walking its path.
    Advancing,
    /// Towers reduced the enemy to zero hit points.
    Killed,
    /// The enemy reached the base.
    Breached,
}

impl EnemyStatus {
    /// Reports whether the enemy has left play.
    #[must_use]
    pub const fn is_dead(self) -> bool {
        !matches!(self, Self::Advancing)
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub hit_points: i32,
    /// Index of the current cell within the path.
    pub path_index: usize,
    /// Route the enemy walks.
    pub path: EnemyPath,
    /// Whether the enemy is still in play.
    pub status: EnemyStatus,
}

impl EnemySnapshot {
    /// Reports whether the enemy still needs to be simulated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.status.is_dead() && self.path_index < self.path.len()
    }
}

/// Read-only snapshot describing every enemy of the current wave.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all towers placed on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cells occupied by the towers, in placement order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellCoord> {
        self.snapshots.iter().map(|snapshot| snapshot.cell).collect()
    }
}

/// Contents of a board cell as encoded for the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing occupies the cell.
    Empty,
    /// A tower occupies the cell.
    Tower,
    /// The base occupies the cell.
    Base,
}

impl CellKind {
    /// Integer code understood by the AI.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Tower => 1,
            Self::Base => 3,
        }
    }
}

/// Row-major occupancy snapshot of the whole grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    cells: Vec<CellKind>,
}

impl BoardSnapshot {
    /// Captures the board occupied by the provided towers and the base.
    #[must_use]
    pub fn capture(towers: &TowerView) -> Self {
        let size = usize::try_from(GRID_SIZE * GRID_SIZE).unwrap_or(0);
        let mut cells = vec![CellKind::Empty; size];
        for tower in towers.iter() {
            if let Some(slot) = tower.cell.grid_index().and_then(|index| cells.get_mut(index)) {
                *slot = CellKind::Tower;
            }
        }
        if let Some(slot) = BASE_CELL.grid_index().and_then(|index| cells.get_mut(index)) {
            *slot = CellKind::Base;
        }
        Self { cells }
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Cell codes in row-major order.
    #[must_use]
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.code()).collect()
    }
}

/// Signal telling the AI whether its attack succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reward {
    /// At least one enemy reached the base.
    BaseBreached,
    /// Every enemy was stopped.
    Repelled,
}

impl Reward {
    /// Numeric reward sent to the AI.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::BaseBreached => 1,
            Self::Repelled => -1,
        }
    }
}

/// Structured report describing how a wave went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Reward signal for the AI.
    pub reward: Reward,
    /// Board occupancy when the wave was played.
    pub state: BoardSnapshot,
    /// Action index reconstructed from the spawned enemies.
    pub action_index: u32,
    /// Board occupancy after the wave.
    pub next_state: BoardSnapshot,
    /// Whether the episode ended; every wave is its own episode.
    pub done: bool,
    /// Row the wave spawned on.
    pub attack_row: u32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is the base.
    Base,
    /// Another tower already occupies the cell.
    Occupied,
    /// The player cannot afford a tower.
    InsufficientFunds,
}

/// Reasons an upgrade purchase may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No towers exist to upgrade.
    NoTowers,
    /// The player cannot afford the upgrade.
    InsufficientFunds,
}

/// Reasons a wave start request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveRejection {
    /// Another wave is still in progress.
    WaveInProgress,
    /// The base has no health left.
    BaseDestroyed,
}
