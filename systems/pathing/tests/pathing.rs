use adaptive_defence_core::{CellCoord, BASE_CELL, GRID_SIZE};
use adaptive_defence_system_pathing::compute_path;

#[test]
fn every_spawn_row_produces_grid_width_plus_base() {
    for row in 0..GRID_SIZE {
        let path = compute_path(row);
        assert_eq!(path.len(), GRID_SIZE as usize + 1, "row {row}");
        assert_eq!(path.spawn(), Some(CellCoord::new(row, 0)));
        assert_eq!(path.cell(path.final_index()), Some(BASE_CELL));
    }
}

#[test]
fn path_moves_one_column_per_step_before_the_base() {
    let path = compute_path(0);
    let cells = path.cells();

    for (column, cell) in cells[..GRID_SIZE as usize].iter().enumerate() {
        assert_eq!(cell.column(), column as u32);
    }
    for pair in cells[..GRID_SIZE as usize].windows(2) {
        assert!(pair[0].row().abs_diff(pair[1].row()) <= 1);
    }
}

#[test]
fn path_from_top_row_descends_diagonally_until_aligned() {
    let path = compute_path(0);
    let rows: Vec<u32> = path.cells().iter().map(CellCoord::row).collect();
    assert_eq!(rows, vec![0, 1, 2, 3, 4, 5, 6, 7, 7]);
}

#[test]
fn path_from_row_four_matches_greedy_walk() {
    let path = compute_path(4);
    let expected = vec![
        CellCoord::new(4, 0),
        CellCoord::new(5, 1),
        CellCoord::new(6, 2),
        CellCoord::new(7, 3),
        CellCoord::new(7, 4),
        CellCoord::new(7, 5),
        CellCoord::new(7, 6),
        CellCoord::new(7, 7),
        CellCoord::new(7, 4),
    ];
    assert_eq!(path.cells(), expected.as_slice());
}

#[test]
fn path_is_deterministic() {
    assert_eq!(compute_path(3), compute_path(3));
}
