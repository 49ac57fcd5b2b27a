//! Plain-text presenter that draws the board on a terminal.

use std::io::Write;

use adaptive_defence_core::{WavePhase, GRID_SIZE};
use adaptive_defence_rendering::{
    BoardScene, HudPresentation, Presentation, Presenter, SceneCell,
};
use adaptive_defence_world::{query, World};
use anyhow::{Context, Result};

/// Captures the frame describing the current world.
pub(crate) fn presentation(world: &World) -> Presentation {
    Presentation {
        board: BoardScene::compose(&query::tower_view(world), &query::enemy_view(world)),
        hud: HudPresentation {
            health: query::health(world),
            money: query::money(world),
            wave: query::round(world),
            wave_progress: query::wave_progress(world),
            message: query::message(world).to_owned(),
            placing_towers: query::placing_towers(world),
            towers_upgraded: query::towers_upgraded(world),
            phase: query::phase(world),
        },
    }
}

/// Presenter writing text frames to any byte sink.
#[derive(Debug)]
pub(crate) struct TerminalPresenter<W> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    /// Prints a line outside of the regular frame.
    pub(crate) fn notice(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write to terminal")?;
        self.out.flush().context("failed to flush terminal")
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_board(&mut self, board: &BoardScene) -> Result<()> {
        let header: String = (0..GRID_SIZE).map(|column| format!(" {column}")).collect();
        writeln!(self.out, "  {header}").context("failed to write board")?;
        for (row, cells) in board.rows().enumerate() {
            let line: String = cells.iter().map(|cell| format!(" {}", glyph(*cell))).collect();
            writeln!(self.out, "{row} {line}").context("failed to write board")?;
        }
        Ok(())
    }

    fn render_hud(&mut self, hud: &HudPresentation) -> Result<()> {
        writeln!(
            self.out,
            "Health {} | Money {} | Wave {} | Remaining {} | Placing {} | Upgrade {} | {}",
            hud.health,
            hud.money,
            hud.wave,
            hud.wave_progress,
            if hud.placing_towers { "on" } else { "off" },
            if hud.towers_upgraded { "yes" } else { "no" },
            phase_label(hud.phase),
        )
        .context("failed to write status line")?;
        if !hud.message.is_empty() {
            writeln!(self.out, "AI: {}", hud.message).context("failed to write status line")?;
        }
        self.out.flush().context("failed to flush terminal")
    }
}

const fn glyph(cell: SceneCell) -> char {
    match cell {
        SceneCell::Empty => '.',
        SceneCell::Tower => 'T',
        SceneCell::Enemy => 'E',
        SceneCell::Base => 'B',
    }
}

const fn phase_label(phase: WavePhase) -> &'static str {
    match phase {
        WavePhase::Idle => "idle",
        WavePhase::RequestingPlan => "awaiting AI",
        WavePhase::Running => "wave running",
        WavePhase::Reporting => "reporting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptive_defence_core::{CellCoord, Command};
    use adaptive_defence_world as world;

    #[test]
    fn draws_towers_base_and_status() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceTower {
                cell: CellCoord::new(0, 1),
            },
            &mut events,
        );

        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter
            .present(&presentation(&world))
            .expect("write to memory");
        let text = String::from_utf8(presenter.into_inner()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "   0 1 2 3 4 5 6 7");
        assert_eq!(lines[1], "0  . T . . . . . .");
        assert_eq!(lines[8], "7  . . . . B . . .");
        assert_eq!(
            lines[9],
            "Health 100 | Money 80 | Wave 1 | Remaining 0 | Placing off | Upgrade no | idle"
        );
    }
}
