#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Adaptive Defence adapters.

use anyhow::Result as AnyResult;
use adaptive_defence_core::{CellCoord, EnemyView, TowerView, WavePhase, BASE_CELL, GRID_SIZE};

/// Content drawn in a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneCell {
    /// Nothing occupies the cell.
    Empty,
    /// A tower stands on the cell.
    Tower,
    /// At least one advancing enemy stands on the cell.
    Enemy,
    /// The player's base.
    Base,
}

/// Row-major picture of the board ready to be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardScene {
    cells: Vec<SceneCell>,
}

impl BoardScene {
    /// Composes the board from the current towers and enemies.
    ///
    /// Advancing enemies are drawn over towers and the base; killed and
    /// breached enemies are not drawn.
    #[must_use]
    pub fn compose(towers: &TowerView, enemies: &EnemyView) -> Self {
        let side = GRID_SIZE as usize;
        let mut cells = vec![SceneCell::Empty; side * side];
        let mut paint = |cell: CellCoord, content: SceneCell| {
            if let Some(slot) = cell.grid_index().and_then(|index| cells.get_mut(index)) {
                *slot = content;
            }
        };

        paint(BASE_CELL, SceneCell::Base);
        for tower in towers.iter() {
            paint(tower.cell, SceneCell::Tower);
        }
        for enemy in enemies.iter().filter(|enemy| enemy.is_active()) {
            paint(enemy.cell, SceneCell::Enemy);
        }

        Self { cells }
    }

    /// Content of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<SceneCell> {
        cell.grid_index()
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Iterates over the board one row at a time, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[SceneCell]> {
        self.cells.chunks(GRID_SIZE as usize)
    }
}

/// Status line shown next to the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Remaining base health; may be negative once the base has fallen.
    pub health: i32,
    /// Money available for towers and upgrades.
    pub money: u32,
    /// Current round number.
    pub wave: u32,
    /// Enemies of the running wave that are still advancing.
    pub wave_progress: u32,
    /// Latest message from the AI or the game.
    pub message: String,
    /// Whether cell selections currently place towers.
    pub placing_towers: bool,
    /// Whether the tower upgrade has been purchased.
    pub towers_upgraded: bool,
    /// Phase of the wave lifecycle.
    pub phase: WavePhase,
}

/// Everything a presenter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Board content.
    pub board: BoardScene,
    /// Status line content.
    pub hud: HudPresentation,
}

/// Output surface capable of drawing Adaptive Defence frames.
pub trait Presenter {
    /// Draws the board.
    fn render_board(&mut self, board: &BoardScene) -> AnyResult<()>;

    /// Draws the status line.
    fn render_hud(&mut self, hud: &HudPresentation) -> AnyResult<()>;

    /// Draws a full frame, board first.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        self.render_board(&presentation.board)?;
        self.render_hud(&presentation.hud)
    }
}
