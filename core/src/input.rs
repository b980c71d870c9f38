//! Mapping of raw front-end input to directions.

use crate::Direction;

/// Minimum swipe displacement, in the front-end's distance units, that
/// counts as a gesture.
pub const SWIPE_THRESHOLD: f64 = 30.0;

/// Map a DOM-style key name (`"ArrowUp"`, ...) to a direction.
pub fn from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Classify a swipe by its dominant axis.
///
/// `dx` grows to the right and `dy` grows downward (screen coordinates).
/// Swipes shorter than [`SWIPE_THRESHOLD`] along the dominant axis, or with
/// non-finite components, yield `None`.
pub fn from_swipe(dx: f64, dy: f64) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    if dx.abs() >= dy.abs() {
        if dx.abs() < SWIPE_THRESHOLD {
            None
        } else if dx > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy.abs() < SWIPE_THRESHOLD {
        None
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}
