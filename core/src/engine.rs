//! Slide-and-merge transformation of a grid along one direction.

use crate::grid::{Grid, SIZE};
use crate::Direction;

/// Outcome of sliding a grid, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// The grid after sliding and merging.
    pub grid: Grid,
    /// Whether any line differs from its original form.
    pub changed: bool,
    /// Sum of the values of all tiles created by merges.
    pub points_gained: u64,
}

/// Slide `grid` in `direction`, merging equal neighbours once each.
///
/// Every row (Left/Right) or column (Up/Down) is read as a line oriented so
/// that tiles travel toward index 0, merged, then written back the same way.
/// The input grid is taken by value and never modified.
pub fn slide(grid: Grid, direction: Direction) -> MoveResult {
    let mut next = grid;
    let mut points_gained = 0;
    let mut changed = false;

    for index in 0..SIZE {
        let coords = line_coords(direction, index);
        let line = coords.map(|(r, c)| grid.get(r, c));
        let (merged, points) = merge_line(line);
        points_gained += points;

        if merged != line {
            changed = true;
            for (&(r, c), &value) in coords.iter().zip(merged.iter()) {
                next.set(r, c, value);
            }
        }
    }

    MoveResult {
        grid: next,
        changed,
        points_gained,
    }
}

/// Grid coordinates of line `index`, ordered in the direction of travel's
/// reverse (element 0 is the cell tiles slide into).
fn line_coords(direction: Direction, index: usize) -> [(usize, usize); SIZE] {
    let mut coords = [(0, 0); SIZE];
    for (k, slot) in coords.iter_mut().enumerate() {
        let pos = if direction.is_reversed() { SIZE - 1 - k } else { k };
        *slot = match direction {
            Direction::Left | Direction::Right => (index, pos),
            Direction::Up | Direction::Down => (pos, index),
        };
    }
    coords
}

/// Largest tile value; tiles of this value no longer merge.
pub const MAX_TILE: u32 = 1 << 31;

/// Compact, merge and pad a single line (moving towards index 0).
/// Returns the new line and the points earned from merges.
fn merge_line(line: [u32; SIZE]) -> ([u32; SIZE], u64) {
    // Compact
    let mut tiles = [0u32; SIZE];
    let mut len = 0;
    for &tile in line.iter().filter(|&&t| t != 0) {
        tiles[len] = tile;
        len += 1;
    }

    // Single merge pass; a merged tile is skipped, never compared again
    let mut result = [0u32; SIZE];
    let mut points = 0;
    let mut write = 0;
    let mut i = 0;
    while i < len {
        // A MAX_TILE pair cannot double inside a u32 cell and stays as is
        let merged = if i + 1 < len && tiles[i] == tiles[i + 1] {
            tiles[i].checked_mul(2)
        } else {
            None
        };
        if let Some(merged) = merged {
            result[write] = merged;
            points += merged as u64;
            i += 2;
        } else {
            result[write] = tiles[i];
            i += 1;
        }
        write += 1;
    }

    (result, points)
}
