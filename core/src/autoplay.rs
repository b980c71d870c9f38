//! Timer-agnostic autoplay controller.
//!
//! The scheduler that owns the timer calls [`Autoplay::tick`] once per period.
//! Each tick performs at most one move, synchronously, against a session the
//! caller borrows mutably, so ticks cannot overlap.

use tracing::debug;

use crate::policy::best_move;
use crate::session::{GameSession, StepResult};
use crate::spawner::Spawner;

/// On/off switch plus the single-step driver for heuristic autoplay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Autoplay {
    enabled: bool,
}

impl Autoplay {
    /// A disabled controller.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// After this returns, no further tick applies a move until re-enabled.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Flip the switch and return the new setting.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Play the policy's best move, if enabled and the session is still live.
    ///
    /// Returns the step result of the move that was applied, or `None` when
    /// nothing was done.
    pub fn tick<S: Spawner>(&self, session: &mut GameSession<S>) -> Option<StepResult> {
        if !self.enabled || session.is_over() {
            return None;
        }
        let direction = best_move(session.grid())?;
        debug!(%direction, "autoplay move");
        Some(session.apply(direction))
    }
}
