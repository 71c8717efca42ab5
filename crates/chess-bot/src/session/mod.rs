//! Two-player game sessions: finding them, deciding whose move it is,
//! classifying moves and persisting the result.

pub mod classifier;
pub mod identity;
pub mod service;
pub mod turn;

use chess_core::Side;

use crate::db::GameRecord;

pub use classifier::{classify_move, MoveOutcome, OutcomeKind};
pub use identity::{canonical_pair_key, pair_key, resolve_session};
pub use service::{ChallengeKind, ChallengeReport, GameService, MoveReport};
pub use turn::{authorize, Authorization, Rejection, TurnState};

/// In-memory view of a stored game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: String,
    pub white: String,
    pub black: String,
    /// Full FEN of the current position.
    pub fen: String,
}

impl GameSession {
    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    /// Colour `user` plays in this game, if they play at all.
    pub fn side_of(&self, user: &str) -> Option<Side> {
        if self.white == user {
            Some(Side::White)
        } else if self.black == user {
            Some(Side::Black)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, user: &str) -> &str {
        if self.white == user {
            &self.black
        } else {
            &self.white
        }
    }
}

impl From<GameRecord> for GameSession {
    fn from(record: GameRecord) -> Self {
        Self {
            id: record.id,
            white: record.white,
            black: record.black,
            fen: record.game_fen,
        }
    }
}
