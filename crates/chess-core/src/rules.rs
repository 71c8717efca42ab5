//! Rules-engine seam.
//!
//! The bot never reasons about chess legality itself. Everything it needs to
//! know about a position (whose move it is, check, mate, game over, where the
//! pieces are) is asked of a [`RulesEngine`]. [`ShakmatyRules`] is the engine
//! used in production; tests may substitute their own.

use serde::{Deserialize, Serialize};
use shakmaty::{
    fen::Fen, san::San, san::SanPlus, uci::UciMove, CastlingMode, Chess, Color, EnPassantMode,
    Move, Position, Role,
};
use thiserror::Error;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value at which the fifty-move rule ends the game.
const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Capitalised label used in score lines ("White", "Black").
    pub fn label(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<Role> for PieceKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }
}

/// One occupied square of a board, e.g. `e1` holding the white king.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquarePiece {
    pub square: String,
    pub side: Side,
    pub kind: PieceKind,
}

/// A move the engine accepted, with the position it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    /// Origin square (`e2`). For castling this is the king's square.
    pub from: String,
    /// Destination square (`e4`). For castling this is where the king lands.
    pub to: String,
    pub san: String,
    pub fen: String,
}

impl PlayedMove {
    /// Long algebraic form of the squares, e.g. `e2e4`.
    pub fn squares(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

/// Capability interface over a chess rules implementation.
///
/// Positions travel as FEN strings so callers never hold engine types.
/// A malformed FEN is an `Err`; an illegal or unreadable move is `Ok(None)`.
pub trait RulesEngine: Send + Sync {
    fn submit_move(&self, fen: &str, move_text: &str) -> Result<Option<PlayedMove>, RulesError>;

    fn side_to_move(&self, fen: &str) -> Result<Side, RulesError>;

    fn is_check(&self, fen: &str) -> Result<bool, RulesError>;

    fn is_checkmate(&self, fen: &str) -> Result<bool, RulesError>;

    /// True for any terminal state: mate, stalemate, insufficient material,
    /// or any other draw the engine knows how to detect.
    fn is_game_over(&self, fen: &str) -> Result<bool, RulesError>;

    fn board_squares(&self, fen: &str) -> Result<Vec<SquarePiece>, RulesError>;

    /// Legal moves in SAN for the side to move.
    fn legal_moves(&self, fen: &str) -> Result<Vec<String>, RulesError>;

    /// Square of `side`'s king, if it has one on the board.
    fn king_square(&self, fen: &str, side: Side) -> Result<Option<String>, RulesError> {
        Ok(self
            .board_squares(fen)?
            .into_iter()
            .find(|p| p.kind == PieceKind::King && p.side == side)
            .map(|p| p.square))
    }
}

/// [`RulesEngine`] backed by shakmaty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        Self
    }

    fn position(fen: &str) -> Result<Chess, RulesError> {
        let fen: Fen = fen
            .trim()
            .parse()
            .map_err(|e| RulesError::InvalidFen(format!("{e}")))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|e| RulesError::InvalidPosition(format!("{e}")))
    }

    /// SAN first (`Nf3`, `exd5`, `O-O`, `Qh4#`), then UCI (`g1f3`).
    fn parse_move(pos: &Chess, move_text: &str) -> Option<Move> {
        let text = move_text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(san_plus) = text.parse::<SanPlus>() {
            if let Ok(mv) = san_plus.san.to_move(pos) {
                return Some(mv);
            }
        }

        let uci: UciMove = text.parse().ok()?;
        uci.to_move(pos).ok()
    }

    fn move_squares(mv: &Move) -> Option<(String, String)> {
        match mv.clone().to_uci(CastlingMode::Standard) {
            UciMove::Normal { from, to, .. } => Some((from.to_string(), to.to_string())),
            _ => None,
        }
    }
}

impl RulesEngine for ShakmatyRules {
    fn submit_move(&self, fen: &str, move_text: &str) -> Result<Option<PlayedMove>, RulesError> {
        let mut pos = Self::position(fen)?;

        let Some(mv) = Self::parse_move(&pos, move_text) else {
            return Ok(None);
        };
        let Some((from, to)) = Self::move_squares(&mv) else {
            return Ok(None);
        };

        let san = San::from_move(&pos, mv.clone()).to_string();
        pos.play_unchecked(mv);

        Ok(Some(PlayedMove {
            from,
            to,
            san,
            fen: Fen::from_position(&pos, EnPassantMode::Legal).to_string(),
        }))
    }

    fn side_to_move(&self, fen: &str) -> Result<Side, RulesError> {
        Ok(Self::position(fen)?.turn().into())
    }

    fn is_check(&self, fen: &str) -> Result<bool, RulesError> {
        Ok(Self::position(fen)?.is_check())
    }

    fn is_checkmate(&self, fen: &str) -> Result<bool, RulesError> {
        Ok(Self::position(fen)?.is_checkmate())
    }

    fn is_game_over(&self, fen: &str) -> Result<bool, RulesError> {
        let pos = Self::position(fen)?;
        Ok(pos.is_game_over() || pos.halfmoves() >= FIFTY_MOVE_PLIES)
    }

    fn board_squares(&self, fen: &str) -> Result<Vec<SquarePiece>, RulesError> {
        let pos = Self::position(fen)?;
        let board = pos.board();

        let mut pieces = Vec::new();
        for sq in board.occupied() {
            if let Some(piece) = board.piece_at(sq) {
                pieces.push(SquarePiece {
                    square: sq.to_string(),
                    side: piece.color.into(),
                    kind: piece.role.into(),
                });
            }
        }
        Ok(pieces)
    }

    fn legal_moves(&self, fen: &str) -> Result<Vec<String>, RulesError> {
        let pos = Self::position(fen)?;
        Ok(pos
            .legal_moves()
            .iter()
            .map(|mv| San::from_move(&pos, mv.clone()).to_string())
            .collect())
    }
}
