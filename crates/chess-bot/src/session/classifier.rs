//! Move classification.
//!
//! Submits a move to the rules engine and sorts the result into one outcome.
//! Nothing here writes; the caller persists `position` for every outcome that
//! [`MoveOutcome::changes_position`].

use chess_core::{relative_score, PlayedMove, RenderOptions, RulesEngine, RulesError, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Invalid,
    Continuing,
    Check,
    Checkmate,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub kind: OutcomeKind,
    /// Position after the move, or the untouched position for `Invalid`.
    pub position: String,
    /// The accepted move; `None` only for `Invalid`.
    pub last_move: Option<PlayedMove>,
    pub side_to_move: Side,
    /// King in check, for `Check` and `Checkmate`.
    pub checked_square: Option<String>,
    /// Score line, for `Continuing` and `Check`.
    pub material: Option<String>,
}

impl MoveOutcome {
    pub fn changes_position(&self) -> bool {
        self.kind != OutcomeKind::Invalid
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, OutcomeKind::Checkmate | OutcomeKind::Draw)
    }

    /// Boards are drawn from the side that moves next.
    pub fn flip_board(&self) -> bool {
        self.side_to_move == Side::Black
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            flip_board: self.flip_board(),
            last_move: self.last_move.as_ref().map(PlayedMove::squares),
            check: self.checked_square.clone(),
        }
    }
}

/// Play `move_text` on `fen` and classify the resulting position.
///
/// Priority is checkmate, then any other game over (a draw), then check.
pub fn classify_move(
    rules: &dyn RulesEngine,
    fen: &str,
    move_text: &str,
) -> Result<MoveOutcome, RulesError> {
    let Some(played) = rules.submit_move(fen, move_text)? else {
        return Ok(MoveOutcome {
            kind: OutcomeKind::Invalid,
            position: fen.to_string(),
            last_move: None,
            side_to_move: rules.side_to_move(fen)?,
            checked_square: None,
            material: None,
        });
    };

    let position = played.fen.clone();
    let side_to_move = rules.side_to_move(&position)?;

    let kind = if rules.is_checkmate(&position)? {
        OutcomeKind::Checkmate
    } else if rules.is_game_over(&position)? {
        OutcomeKind::Draw
    } else if rules.is_check(&position)? {
        OutcomeKind::Check
    } else {
        OutcomeKind::Continuing
    };

    let checked_square = match kind {
        OutcomeKind::Check | OutcomeKind::Checkmate => rules.king_square(&position, side_to_move)?,
        _ => None,
    };
    let material = match kind {
        OutcomeKind::Check | OutcomeKind::Continuing => Some(relative_score(&position)),
        _ => None,
    };

    Ok(MoveOutcome {
        kind,
        position,
        last_move: Some(played),
        side_to_move,
        checked_square,
        material,
    })
}
