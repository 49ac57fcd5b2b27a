#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure path generator that routes enemies from the left edge to the base.

use adaptive_defence_core::{CellCoord, EnemyPath, BASE_CELL, GRID_SIZE};

/// Computes the route an enemy spawned on `spawn_row` walks toward the base.
///
/// The walk starts at `(spawn_row, 0)` and moves one column east per step,
/// drifting one row toward the base row until aligned. Once every column has
/// been visited the base cell is appended, so the path always holds
/// `GRID_SIZE + 1` cells. This is a greedy walk rather than a shortest path:
/// the final hop from the last column to the base may span several cells.
#[must_use]
pub fn compute_path(spawn_row: u32) -> EnemyPath {
    let capacity = usize::try_from(GRID_SIZE).unwrap_or(0) + 1;
    let mut cells = Vec::with_capacity(capacity);
    let mut row = spawn_row;

    for column in 0..GRID_SIZE {
        cells.push(CellCoord::new(row, column));
        row = step_toward(row, BASE_CELL.row());
    }

    cells.push(BASE_CELL);
    EnemyPath::new(cells)
}

fn step_toward(row: u32, target: u32) -> u32 {
    if row < target {
        row + 1
    } else if row > target {
        row - 1
    } else {
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_converges_from_both_sides() {
        assert_eq!(step_toward(2, 7), 3);
        assert_eq!(step_toward(9, 7), 8);
        assert_eq!(step_toward(7, 7), 7);
    }
}
