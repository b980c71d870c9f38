//! Detection of grids that admit no further move.

use crate::grid::{Grid, SIZE};

/// True iff the grid is full and no two orthogonally adjacent cells match.
///
/// Scans every row pair and every column pair, so the result agrees with
/// "no direction changes the grid".
pub fn is_terminal(grid: &Grid) -> bool {
    let cells = grid.rows();

    if cells.iter().flatten().any(|&v| v == 0) {
        return false;
    }

    for i in 0..SIZE {
        for j in 0..SIZE - 1 {
            // horizontal pair in row i, vertical pair in column i
            if cells[i][j] == cells[i][j + 1] || cells[j][i] == cells[j + 1][i] {
                return false;
            }
        }
    }

    true
}
