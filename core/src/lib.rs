//! # slide2048 Core Engine
//!
//! A pure Rust implementation of the 2048 rules: a 4x4 grid of powers of two
//! that slides and merges along a direction, a seedable tile spawner, a
//! terminal-state detector and a one-ply heuristic policy for autoplay.
//! Everything that renders, maps input or stores scores sits outside this
//! crate and talks to it through the types re-exported here.
//!
//! ## Example
//!
//! ```rust
//! use slide2048_core::{Direction, GameSession, Status};
//!
//! let mut session = GameSession::new(42); // seeded session
//! let result = session.apply(Direction::Left);
//! println!("Score: {}, Changed: {}", session.score(), result.changed);
//! assert_eq!(session.status(), Status::Playing);
//! ```

use serde::{Deserialize, Serialize};

pub mod autoplay;
pub mod engine;
pub mod grid;
pub mod identity;
pub mod input;
pub mod leaderboard;
pub mod policy;
pub mod session;
pub mod spawner;
pub mod terminal;

pub use autoplay::Autoplay;
pub use engine::{slide, MoveResult};
pub use grid::{Grid, SIZE};
pub use policy::{best_move, evaluate};
pub use session::{GameSession, SessionState, Status, StepResult};
pub use spawner::{RandomSpawner, ScriptedSpawner, Spawner};
pub use terminal::is_terminal;

/// The four possible slide directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Convert a u8 to a Direction (0=Up, 1=Down, 2=Left, 3=Right).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// All four directions in wire-code order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// True for Right and Down, whose lines are read back to front.
    fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_u8() {
        assert_eq!(Direction::from_u8(0), Some(Direction::Up));
        assert_eq!(Direction::from_u8(1), Some(Direction::Down));
        assert_eq!(Direction::from_u8(2), Some(Direction::Left));
        assert_eq!(Direction::from_u8(3), Some(Direction::Right));
        assert_eq!(Direction::from_u8(4), None);
        assert_eq!(Direction::from_u8(255), None);
    }

    #[test]
    fn test_direction_codes_round_trip() {
        for direction in Direction::all() {
            assert_eq!(Direction::from_u8(direction as u8), Some(direction));
        }
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Right.to_string(), "right");
    }
}
