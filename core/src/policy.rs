//! Positional heuristic and one-ply greedy move selection for autoplay.

use crate::engine::slide;
use crate::grid::{Grid, SIZE};
use crate::Direction;

/// Positional weights favouring the top-left corner.
pub const WEIGHTS: [[i64; SIZE]; SIZE] = [
    [4, 3, 2, 1],
    [3, 2, 1, 0],
    [2, 1, 0, -1],
    [1, 0, -1, -2],
];

/// Multiplier applied to the largest corner tile.
const CORNER_BONUS: i64 = 2;
/// Reward per empty cell.
const EMPTY_BONUS: i64 = 10;

/// Order in which candidate moves are tried; earlier wins ties.
pub const SEARCH_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

/// Score a grid: weighted tile sum, plus twice the largest corner tile,
/// plus ten per empty cell.
pub fn evaluate(grid: &Grid) -> i64 {
    let positional: i64 = grid
        .rows()
        .iter()
        .zip(WEIGHTS.iter())
        .flat_map(|(row, weights)| row.iter().zip(weights.iter()))
        .map(|(&value, &weight)| value as i64 * weight)
        .sum();

    let corner = grid.corners().into_iter().max().unwrap_or(0) as i64;
    let empty = grid.empty_count() as i64;

    positional + CORNER_BONUS * corner + EMPTY_BONUS * empty
}

/// Pick the move whose resulting grid evaluates highest.
///
/// Only moves that change the grid are candidates. Ties keep the earliest
/// direction in [`SEARCH_ORDER`]. Returns `None` exactly when the grid is
/// terminal.
pub fn best_move(grid: &Grid) -> Option<Direction> {
    let mut best: Option<(Direction, i64)> = None;

    for direction in SEARCH_ORDER {
        let result = slide(*grid, direction);
        if !result.changed {
            continue;
        }
        let score = evaluate(&result.grid);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((direction, score)),
        }
    }

    best.map(|(direction, _)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::is_terminal;

    #[test]
    fn test_evaluate_empty_grid() {
        assert_eq!(evaluate(&Grid::EMPTY), 160);
    }

    #[test]
    fn test_evaluate_single_corner_tile() {
        // 2 * 4 (weight) + 2 * 2 (corner) + 15 * 10 (empties)
        let grid = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(evaluate(&grid), 8 + 4 + 150);
    }

    #[test]
    fn test_evaluate_negative_weights() {
        // 8 * -2 + 2 * 8 (corner) + 150
        let grid = Grid::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 0, 8]]);
        assert_eq!(evaluate(&grid), -16 + 16 + 150);
    }

    #[test]
    fn test_evaluate_prefers_anchor_corner() {
        let anchored = Grid::from_rows([[64, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let opposite = Grid::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 0, 64]]);
        assert!(evaluate(&anchored) > evaluate(&opposite));
    }

    #[test]
    fn test_best_move_none_when_terminal() {
        let grid = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(is_terminal(&grid));
        assert_eq!(best_move(&grid), None);
    }

    #[test]
    fn test_best_move_tie_goes_to_earliest() {
        // Up and Left both land the tile on a weight-1 cell; Up comes first
        let grid = Grid::from_rows([[0; 4], [0; 4], [0; 4], [0, 0, 0, 4]]);
        assert_eq!(best_move(&grid), Some(Direction::Up));
    }

    #[test]
    fn test_best_move_skips_unchanged_directions() {
        // Up and Left change nothing; Right gives (0,3) weight 1, Down gives (3,0) weight 1
        let grid = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(best_move(&grid), Some(Direction::Right));
    }

    #[test]
    fn test_best_move_takes_merge() {
        let grid = Grid::from_rows([[4, 4, 8, 16], [2, 8, 16, 32], [4, 16, 32, 64], [8, 32, 64, 128]]);
        // Only Left and Right merge the top row; Left keeps the 8 next to the anchor
        let choice = best_move(&grid);
        assert_eq!(choice, Some(Direction::Left));
    }
}
