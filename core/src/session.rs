//! The game session state machine.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::slide;
use crate::grid::Grid;
use crate::spawner::{RandomSpawner, Spawner};
use crate::terminal::is_terminal;
use crate::Direction;

/// Whether the session still accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Over,
}

/// Everything a renderer needs to draw the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub grid: Grid,
    pub score: u64,
    pub status: Status,
}

impl SessionState {
    /// Empty grid with two spawned tiles, zero score, playing.
    fn fresh<S: Spawner>(spawner: &mut S) -> Self {
        let grid = spawner.spawn(Grid::EMPTY);
        let grid = spawner.spawn(grid);
        SessionState {
            grid,
            score: 0,
            status: Status::Playing,
        }
    }
}

/// Result of applying a direction to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the grid changed (and a new tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub points_gained: u64,
    /// Whether the session is over after this step.
    pub over: bool,
}

/// A single game: owns the grid, score and status, and the spawner that
/// feeds it new tiles.
///
/// All mutation goes through [`GameSession::apply`] and
/// [`GameSession::reset`]; each commits grid, score and status together.
#[derive(Debug, Clone)]
pub struct GameSession<S = RandomSpawner> {
    state: SessionState,
    spawner: S,
}

impl GameSession<RandomSpawner> {
    /// Create a new session whose tiles come from a `SmallRng` seeded with `seed`.
    ///
    /// The session starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        Self::with_spawner(RandomSpawner::from_seed(seed))
    }

    /// Reset to a fresh game whose random stream restarts from `seed`.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.spawner.reseed(seed);
        self.reset();
    }
}

impl<S: Spawner> GameSession<S> {
    pub fn with_spawner(mut spawner: S) -> Self {
        let state = SessionState::fresh(&mut spawner);
        GameSession { state, spawner }
    }

    /// Resume from a saved state. A terminal grid is reported as over
    /// regardless of the saved status.
    pub fn from_state(state: SessionState, spawner: S) -> Self {
        let status = if state.status == Status::Over || is_terminal(&state.grid) {
            Status::Over
        } else {
            Status::Playing
        };
        GameSession {
            state: SessionState { status, ..state },
            spawner,
        }
    }

    /// Slide the grid in `direction`.
    ///
    /// A move that changes nothing, or any move once the session is over,
    /// leaves the state untouched and reports `changed: false`.
    pub fn apply(&mut self, direction: Direction) -> StepResult {
        if self.state.status == Status::Over {
            return StepResult {
                changed: false,
                points_gained: 0,
                over: true,
            };
        }

        let result = slide(self.state.grid, direction);
        if !result.changed {
            return StepResult {
                changed: false,
                points_gained: 0,
                over: false,
            };
        }

        let grid = self.spawner.spawn(result.grid);
        let score = self.state.score.saturating_add(result.points_gained);
        let status = if is_terminal(&grid) {
            Status::Over
        } else {
            Status::Playing
        };

        self.state = SessionState {
            grid,
            score,
            status,
        };

        debug!(%direction, points = result.points_gained, score, "move applied");
        if status == Status::Over {
            info!(score, max_tile = grid.max_tile(), "game over");
        }

        StepResult {
            changed: true,
            points_gained: result.points_gained,
            over: status == Status::Over,
        }
    }

    /// Discard the current game and start a new one with the same spawner.
    pub fn reset(&mut self) {
        info!(previous_score = self.state.score, "session reset");
        self.state = SessionState::fresh(&mut self.spawner);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.status == Status::Over
    }

    /// Which directions would change the grid, as `[Up, Down, Left, Right]`.
    pub fn legal_moves(&self) -> [bool; 4] {
        if self.is_over() {
            return [false; 4];
        }
        Direction::all().map(|direction| slide(self.state.grid, direction).changed)
    }

    pub fn max_tile(&self) -> u32 {
        self.state.grid.max_tile()
    }

    pub fn empty_count(&self) -> usize {
        self.state.grid.empty_count()
    }
}

impl<S> std::fmt::Display for GameSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Score: {}", self.state.score)?;
        write!(f, "{}", self.state.grid)?;
        if self.state.status == Status::Over {
            writeln!(f, "GAME OVER")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::ScriptedSpawner;

    const CHECKERBOARD: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    // -------------------------------------------------------------------------
    // Init and reset
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_session_has_two_tiles() {
        let session = GameSession::new(42);
        assert_eq!(session.empty_count(), 14);
        assert_eq!(session.score(), 0);
        assert_eq!(session.status(), Status::Playing);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let mut a = GameSession::new(54321);
        let mut b = GameSession::new(54321);
        assert_eq!(a.state(), b.state());

        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            a.apply(direction);
            b.apply(direction);
            assert_eq!(a.state(), b.state());
        }
    }

    #[test]
    fn test_reset_with_seed_matches_fresh_session() {
        let mut session = GameSession::new(42);
        session.apply(Direction::Left);
        session.apply(Direction::Up);

        session.reset_with_seed(42);
        let fresh = GameSession::new(42);
        assert_eq!(session.state(), fresh.state());
    }

    #[test]
    fn test_reset_revives_finished_session() {
        let mut session =
            GameSession::from_state(over_state(), ScriptedSpawner::new([(1, 1, 2), (2, 2, 2)]));
        assert!(session.is_over());

        session.reset();
        assert_eq!(session.status(), Status::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.grid().get(1, 1), 2);
        assert_eq!(session.grid().get(2, 2), 2);
        assert_eq!(session.empty_count(), 14);
    }

    // -------------------------------------------------------------------------
    // Apply
    // -------------------------------------------------------------------------

    #[test]
    fn test_merge_scenario() {
        let spawner = ScriptedSpawner::new([(0, 0, 2), (0, 1, 2), (3, 3, 2)]);
        let mut session = GameSession::with_spawner(spawner);

        let result = session.apply(Direction::Left);
        assert!(result.changed);
        assert_eq!(result.points_gained, 4);
        assert_eq!(session.grid().rows()[0], [4, 0, 0, 0]);
        assert_eq!(session.grid().get(3, 3), 2);
        assert_eq!(session.score(), 4);
        assert_eq!(session.status(), Status::Playing);
    }

    #[test]
    fn test_unchanged_move_is_silent() {
        let spawner = ScriptedSpawner::new([(0, 0, 2), (1, 0, 4)]);
        let mut session = GameSession::with_spawner(spawner);
        let before = *session.state();

        let result = session.apply(Direction::Left);
        assert!(!result.changed);
        assert_eq!(result.points_gained, 0);
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn test_move_ending_the_game() {
        // Left merges the two 8s; the scripted spawn fills the hole with a
        // tile that leaves no pairs anywhere.
        let grid = Grid::from_rows([[8, 8, 2, 4], [2, 4, 8, 2], [4, 2, 4, 8], [2, 4, 2, 4]]);
        let state = SessionState {
            grid,
            score: 100,
            status: Status::Playing,
        };
        let mut session = GameSession::from_state(state, ScriptedSpawner::new([(0, 3, 32)]));

        let result = session.apply(Direction::Left);
        assert!(result.changed);
        assert!(result.over);
        assert_eq!(session.grid().rows()[0], [16, 2, 4, 32]);
        assert_eq!(session.score(), 116);
        assert_eq!(session.status(), Status::Over);
    }

    #[test]
    fn test_apply_while_over_is_ignored() {
        let mut session = GameSession::from_state(over_state(), ScriptedSpawner::default());
        let before = *session.state();

        for direction in Direction::all() {
            let result = session.apply(direction);
            assert!(!result.changed);
            assert!(result.over);
            assert_eq!(*session.state(), before);
        }
    }

    #[test]
    fn test_from_state_detects_terminal_grid() {
        let state = SessionState {
            grid: Grid::from_rows(CHECKERBOARD),
            score: 0,
            status: Status::Playing,
        };
        let session = GameSession::from_state(state, ScriptedSpawner::default());
        assert!(session.is_over());
        assert_eq!(session.legal_moves(), [false; 4]);
    }

    #[test]
    fn test_legal_moves() {
        let state = SessionState {
            grid: Grid::from_rows([[2, 0, 0, 0], [4, 0, 0, 0], [8, 0, 0, 0], [16, 0, 0, 0]]),
            score: 0,
            status: Status::Playing,
        };
        let session = GameSession::from_state(state, ScriptedSpawner::default());
        // [Up, Down, Left, Right]
        assert_eq!(session.legal_moves(), [false, false, false, true]);
    }

    #[test]
    fn test_score_beyond_u32_range() {
        let top = 1u32 << 30;
        let grid = Grid::from_rows([[top, top, top, top], [2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64]]);
        let state = SessionState {
            grid,
            score: u32::MAX as u64,
            status: Status::Playing,
        };
        let mut session = GameSession::from_state(state, ScriptedSpawner::new([(0, 3, 2)]));

        let result = session.apply(Direction::Left);
        assert!(result.changed);
        assert_eq!(result.points_gained, 1u64 << 32);
        assert_eq!(session.score(), u32::MAX as u64 + (1u64 << 32));
        assert_eq!(session.grid().rows()[0], [top * 2, top * 2, 0, 2]);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut session = GameSession::new(7);
        let mut last = 0;
        for i in 0..200 {
            session.apply(Direction::all()[i % 4]);
            assert!(session.score() >= last);
            last = session.score();
        }
    }

    #[test]
    fn test_display_format() {
        let session = GameSession::new(42);
        let display = format!("{}", session);
        assert!(display.contains("Score: 0"));
        assert!(display.contains("+------+"));
    }

    fn over_state() -> SessionState {
        SessionState {
            grid: Grid::from_rows(CHECKERBOARD),
            score: 1234,
            status: Status::Over,
        }
    }
}
