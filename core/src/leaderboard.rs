//! High-score storage seam.
//!
//! Storage backends implement [`Leaderboard`]. Their failures stay on this
//! side of the seam: [`record_final_score`] logs them and never touches the
//! session.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::identity::User;
use crate::session::{SessionState, Status};

/// How many entries a leaderboard read returns.
pub const TOP_N: usize = 10;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: String,
    pub user_name: String,
    pub score: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
    #[error("score must be positive")]
    ZeroScore,
}

pub trait Leaderboard {
    /// Store a score and return the new entry's id.
    fn submit(&mut self, score: u64, user_id: &str, user_name: &str) -> Result<String, LeaderboardError>;

    /// The best `n` entries, highest score first.
    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// Submit the final score of a finished session.
///
/// Only submits when the session is over, a user is signed in and the score
/// is positive. Returns whether the score was stored; a failed submit is
/// logged and otherwise ignored.
pub fn record_final_score(
    state: &SessionState,
    user: Option<&User>,
    board: &mut dyn Leaderboard,
) -> bool {
    if state.status != Status::Over || state.score == 0 {
        return false;
    }
    let Some(user) = user else {
        return false;
    };

    match board.submit(state.score, &user.id, &user.display_name) {
        Ok(id) => {
            info!(%id, score = state.score, user = %user.display_name, "score saved");
            true
        }
        Err(e) => {
            warn!(error = %e, score = state.score, "saving score failed");
            false
        }
    }
}

/// Fetch the top [`TOP_N`] entries, logging and returning an empty list on failure.
pub fn top_scores(board: &dyn Leaderboard) -> Vec<ScoreEntry> {
    board.top(TOP_N).unwrap_or_else(|e| {
        warn!(error = %e, "reading leaderboard failed");
        Vec::new()
    })
}

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: ScoreEntry,
    user_id: String,
}

/// A process-local leaderboard.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaderboard {
    entries: Vec<StoredEntry>,
    next_id: u64,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries submitted by `user_id`, in submission order.
    pub fn entries_for(&self, user_id: &str) -> Vec<ScoreEntry> {
        self.entries
            .iter()
            .filter(|stored| stored.user_id == user_id)
            .map(|stored| stored.entry.clone())
            .collect()
    }
}

impl Leaderboard for InMemoryLeaderboard {
    fn submit(&mut self, score: u64, user_id: &str, user_name: &str) -> Result<String, LeaderboardError> {
        if score == 0 {
            return Err(LeaderboardError::ZeroScore);
        }
        self.next_id += 1;
        let id = format!("score-{}", self.next_id);
        self.entries.push(StoredEntry {
            entry: ScoreEntry {
                id: id.clone(),
                user_name: user_name.to_string(),
                score,
            },
            user_id: user_id.to_string(),
        });
        Ok(id)
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut entries: Vec<ScoreEntry> = self.entries.iter().map(|s| s.entry.clone()).collect();
        // Stable sort: equal scores stay in submission order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(n);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    struct Offline;

    impl Leaderboard for Offline {
        fn submit(&mut self, _: u64, _: &str, _: &str) -> Result<String, LeaderboardError> {
            Err(LeaderboardError::Unavailable("offline".into()))
        }

        fn top(&self, _: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
            Err(LeaderboardError::Unavailable("offline".into()))
        }
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            display_name: "Grace".into(),
            photo_url: None,
        }
    }

    fn finished(score: u64) -> SessionState {
        SessionState {
            grid: Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]),
            score,
            status: Status::Over,
        }
    }

    #[test]
    fn test_top_is_sorted_and_capped() {
        let mut board = InMemoryLeaderboard::new();
        for score in 1..=15u64 {
            board.submit(score * 100, "u", "name").unwrap();
        }
        let top = board.top(TOP_N).unwrap();
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].score, 1500);
        assert_eq!(top[9].score, 600);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_equal_scores_keep_submission_order() {
        let mut board = InMemoryLeaderboard::new();
        let first = board.submit(500, "a", "A").unwrap();
        let second = board.submit(500, "b", "B").unwrap();
        let top = board.top(2).unwrap();
        assert_eq!(top[0].id, first);
        assert_eq!(top[1].id, second);
    }

    #[test]
    fn test_record_final_score() {
        let mut board = InMemoryLeaderboard::new();
        assert!(record_final_score(&finished(2048), Some(&user()), &mut board));
        let entries = board.entries_for("u1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_name, "Grace");
        assert_eq!(entries[0].score, 2048);
    }

    #[test]
    fn test_record_skips_ineligible_sessions() {
        let mut board = InMemoryLeaderboard::new();

        // No user
        assert!(!record_final_score(&finished(2048), None, &mut board));
        // Zero score
        assert!(!record_final_score(&finished(0), Some(&user()), &mut board));
        // Still playing
        let playing = SessionState {
            status: Status::Playing,
            ..finished(64)
        };
        assert!(!record_final_score(&playing, Some(&user()), &mut board));

        assert!(board.is_empty());
    }

    #[test]
    fn test_backend_failure_is_contained() {
        let state = finished(512);
        assert!(!record_final_score(&state, Some(&user()), &mut Offline));
        assert_eq!(state.status, Status::Over);
        assert!(top_scores(&Offline).is_empty());
    }
}
