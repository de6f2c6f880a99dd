use thiserror::Error;

use crate::types::LEADERBOARD_LEN;

/// Errors reported by [`Leaderboard`](crate::leaderboard::Leaderboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("leaderboard index {index} is out of range 0..{len}", len = LEADERBOARD_LEN)]
    IndexOutOfRange { index: usize },
}
