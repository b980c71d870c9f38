//! The 4x4 board value type.

use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const SIZE: usize = 4;

/// A 4x4 grid of tiles indexed as `cells[row][col]`.
///
/// Empty cells are 0, tiles hold their value (2, 4, 8, ...). `Grid` is
/// `Copy`, so every engine operation works on its own value and never
/// touches the caller's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u32; SIZE]; SIZE],
}

impl Grid {
    /// An empty grid.
    pub const EMPTY: Grid = Grid {
        cells: [[0; SIZE]; SIZE],
    };

    pub fn from_rows(cells: [[u32; SIZE]; SIZE]) -> Self {
        Grid { cells }
    }

    /// Build a grid from 16 values in row-major order.
    pub fn from_flat(values: [u32; SIZE * SIZE]) -> Self {
        let mut cells = [[0; SIZE]; SIZE];
        for (i, value) in values.into_iter().enumerate() {
            cells[i / SIZE][i % SIZE] = value;
        }
        Grid { cells }
    }

    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.cells
    }

    /// Flatten to 16 values in row-major order.
    pub fn to_flat(&self) -> [u32; SIZE * SIZE] {
        let mut flat = [0; SIZE * SIZE];
        for (i, value) in self.cells.iter().flatten().enumerate() {
            flat[i] = *value;
        }
        flat
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row][col] = value;
    }

    /// Coordinates of every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empties = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    empties.push((r, c));
                }
            }
        }
        empties
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v == 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| v as u64).sum()
    }

    /// The four corner values: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [u32; 4] {
        let last = SIZE - 1;
        [
            self.cells[0][0],
            self.cells[0][last],
            self.cells[last][0],
            self.cells[last][last],
        ]
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in &self.cells {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_layout_is_row_major() {
        let grid = Grid::from_flat([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(grid.get(0, 3), 4);
        assert_eq!(grid.get(1, 0), 5);
        assert_eq!(grid.get(3, 3), 16);
        assert_eq!(grid.to_flat()[6], 7);
    }

    #[test]
    fn test_empty_cells() {
        let grid = Grid::from_rows([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 4, 0], [0, 0, 0, 8]]);
        let empties = grid.empty_cells();
        assert_eq!(empties.len(), 13);
        assert_eq!(grid.empty_count(), 13);
        assert_eq!(empties[0], (0, 1));
        assert!(!empties.contains(&(2, 2)));
    }

    #[test]
    fn test_max_sum_corners() {
        let grid = Grid::from_rows([[2, 0, 0, 16], [0, 0, 0, 0], [0, 64, 0, 0], [4, 0, 0, 8]]);
        assert_eq!(grid.max_tile(), 64);
        assert_eq!(grid.sum(), 94);
        assert_eq!(grid.corners(), [2, 16, 4, 8]);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(Grid::EMPTY, Grid::default());
        assert_eq!(Grid::EMPTY.max_tile(), 0);
        assert_eq!(Grid::EMPTY.empty_count(), 16);
    }

    #[test]
    fn test_display_format() {
        let grid = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]);
        let display = grid.to_string();
        assert!(display.contains("+------+"));
        assert!(display.contains("2048"));
    }
}
