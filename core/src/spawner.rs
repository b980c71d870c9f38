//! Placement of new tiles after an accepted move.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::grid::Grid;

/// Probability that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// Something that places one new tile into a grid.
///
/// Implementations must return the grid with exactly one empty cell filled,
/// or the grid unchanged when it has no empty cell.
pub trait Spawner {
    fn spawn(&mut self, grid: Grid) -> Grid;
}

/// Place a tile uniformly among the empty cells of `grid`.
/// 90% chance of 2, 10% chance of 4. A full grid is returned as-is.
pub fn spawn_tile<R: Rng + ?Sized>(mut grid: Grid, rng: &mut R) -> Grid {
    let empty_cells = grid.empty_cells();
    if empty_cells.is_empty() {
        return grid;
    }

    let (row, col) = empty_cells[rng.gen_range(0..empty_cells.len())];
    let value = if rng.gen_bool(TWO_PROBABILITY) { 2 } else { 4 };
    grid.set(row, col, value);
    debug!(row, col, value, "spawned tile");
    grid
}

/// The production spawner, backed by a seedable `SmallRng` so a game can be
/// replayed from its seed.
#[derive(Debug, Clone)]
pub struct RandomSpawner {
    rng: SmallRng,
}

impl RandomSpawner {
    pub fn from_seed(seed: u64) -> Self {
        RandomSpawner {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

impl Spawner for RandomSpawner {
    fn spawn(&mut self, grid: Grid) -> Grid {
        spawn_tile(grid, &mut self.rng)
    }
}

/// Places tiles from a fixed script of `(row, col, value)` placements.
///
/// A scripted placement whose cell is already occupied is skipped. Once the
/// script runs out, a 2 goes into the first empty cell in row-major order.
/// Used to replay recorded games and to pin down session scenarios.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpawner {
    script: VecDeque<(usize, usize, u32)>,
}

impl ScriptedSpawner {
    pub fn new<I>(placements: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, u32)>,
    {
        ScriptedSpawner {
            script: placements.into_iter().collect(),
        }
    }

    /// Placements not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Spawner for ScriptedSpawner {
    fn spawn(&mut self, mut grid: Grid) -> Grid {
        while let Some((row, col, value)) = self.script.pop_front() {
            if grid.get(row, col) == 0 {
                grid.set(row, col, value);
                return grid;
            }
        }
        if let Some(&(row, col)) = grid.empty_cells().first() {
            grid.set(row, col, 2);
        }
        grid
    }
}
