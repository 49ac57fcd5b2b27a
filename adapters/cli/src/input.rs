//! Parsing of the commands typed by the player.

use adaptive_defence_core::CellCoord;
use thiserror::Error;

/// Usage text printed by `help`.
pub(crate) const HELP: &str = "\
commands:
  place          toggle tower placement mode
  <row> <col>    select a cell (places a tower while placement mode is on)
  upgrade        buy the tower upgrade
  start          ask the AI for the next wave
  status         redraw the board
  help           show this text
  quit           leave the game";

/// Action requested by one line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerInput {
    TogglePlacement,
    Select(CellCoord),
    Upgrade,
    Start,
    Status,
    Help,
    Quit,
}

/// Reasons a line of input could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputError {
    #[error("type a command, or `help` for the list")]
    Empty,
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("`{0}` is not a cell; use `<row> <col>` with non-negative numbers")]
    InvalidCell(String),
}

impl PlayerInput {
    pub(crate) fn parse(line: &str) -> Result<Self, InputError> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(InputError::Empty);
        };
        let rest: Vec<&str> = words.collect();

        let keyword = match first.to_ascii_lowercase().as_str() {
            "place" | "p" => Some(Self::TogglePlacement),
            "upgrade" | "u" => Some(Self::Upgrade),
            "start" | "s" => Some(Self::Start),
            "status" => Some(Self::Status),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        };
        if let Some(input) = keyword {
            return if rest.is_empty() {
                Ok(input)
            } else {
                Err(InputError::Unknown(line.trim().to_owned()))
            };
        }

        if first.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '+') {
            return parse_cell(first, &rest)
                .ok_or_else(|| InputError::InvalidCell(line.trim().to_owned()));
        }
        Err(InputError::Unknown(first.to_owned()))
    }
}

fn parse_cell(row: &str, rest: &[&str]) -> Option<PlayerInput> {
    let [column] = rest else {
        return None;
    };
    let row = row.parse::<u32>().ok()?;
    let column = column.parse::<u32>().ok()?;
    Some(PlayerInput::Select(CellCoord::new(row, column)))
}
