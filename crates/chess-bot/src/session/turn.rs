//! Whose move is it.
//!
//! Turn is never stored. It is read off the position every time so it cannot
//! drift from the board.

use chess_core::{RulesEngine, RulesError, Side};

use crate::error::GameError;

use super::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    WhiteToMove,
    BlackToMove,
}

impl TurnState {
    pub fn of(rules: &dyn RulesEngine, session: &GameSession) -> Result<Self, RulesError> {
        Ok(rules.side_to_move(&session.fen)?.into())
    }

    pub fn side(self) -> Side {
        match self {
            TurnState::WhiteToMove => Side::White,
            TurnState::BlackToMove => Side::Black,
        }
    }
}

impl From<Side> for TurnState {
    fn from(side: Side) -> Self {
        match side {
            Side::White => TurnState::WhiteToMove,
            Side::Black => TurnState::BlackToMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotYourTurn,
    /// Mate or draw is already on the board.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized(Side),
    Rejected(Rejection),
}

impl Authorization {
    pub fn into_result(self) -> Result<Side, GameError> {
        match self {
            Authorization::Authorized(side) => Ok(side),
            Authorization::Rejected(Rejection::NotYourTurn) => Err(GameError::NotYourTurn),
            Authorization::Rejected(Rejection::GameOver) => Err(GameError::GameOver),
        }
    }
}

/// May `actor` move now? Finished games authorize nobody.
pub fn authorize(
    rules: &dyn RulesEngine,
    session: &GameSession,
    actor: &str,
) -> Result<Authorization, RulesError> {
    if rules.is_game_over(&session.fen)? {
        return Ok(Authorization::Rejected(Rejection::GameOver));
    }

    let side = TurnState::of(rules, session)?.side();
    if session.player(side) == actor {
        Ok(Authorization::Authorized(side))
    } else {
        Ok(Authorization::Rejected(Rejection::NotYourTurn))
    }
}
