//! Material balance from the piece-placement field of a FEN.

use std::fmt;

use crate::rules::Side;

/// Standard piece values; kings count for nothing.
fn piece_value(piece: char) -> i32 {
    match piece.to_ascii_lowercase() {
        'p' => 1,
        'n' | 'b' => 3,
        'r' => 5,
        'q' => 9,
        _ => 0,
    }
}

/// Relative material between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialBalance {
    Even,
    Ahead { side: Side, by: u32 },
}

impl fmt::Display for MaterialBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialBalance::Even => f.write_str("White: 0, Black 0"),
            MaterialBalance::Ahead { side, by } => write!(f, "{}: +{}", side.label(), by),
        }
    }
}

/// Sum of piece values for (white, black). Only the placement field is read,
/// so a full FEN or a bare placement string both work.
pub fn material_totals(fen: &str) -> (i32, i32) {
    let placement = fen.split_whitespace().next().unwrap_or("");

    placement
        .chars()
        .fold((0, 0), |(white, black), c| {
            if c.is_ascii_uppercase() {
                (white + piece_value(c), black)
            } else if c.is_ascii_lowercase() {
                (white, black + piece_value(c))
            } else {
                (white, black)
            }
        })
}

pub fn material_balance(fen: &str) -> MaterialBalance {
    let (white, black) = material_totals(fen);
    let white_diff = white - black;
    let black_diff = black - white;

    if white_diff == 0 {
        MaterialBalance::Even
    } else if white_diff > black_diff {
        MaterialBalance::Ahead { side: Side::White, by: white_diff.unsigned_abs() }
    } else {
        MaterialBalance::Ahead { side: Side::Black, by: black_diff.unsigned_abs() }
    }
}

/// Score line shown after non-terminal moves, e.g. `Black: +9`.
pub fn relative_score(fen: &str) -> String {
    material_balance(fen).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::STARTING_FEN;

    #[test]
    fn test_starting_position_is_even() {
        assert_eq!(material_totals(STARTING_FEN), (39, 39));
        assert_eq!(material_balance(STARTING_FEN), MaterialBalance::Even);
        assert_eq!(relative_score(STARTING_FEN), "White: 0, Black 0");
    }

    #[test]
    fn test_white_missing_queen() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1";
        assert_eq!(
            material_balance(fen),
            MaterialBalance::Ahead { side: Side::Black, by: 9 }
        );
        assert_eq!(relative_score(fen), "Black: +9");
    }

    #[test]
    fn test_white_up_a_knight_and_pawn() {
        // Black is missing the b8 knight and the a7 pawn.
        let fen = "r1bqkbnr/1ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1";
        assert_eq!(relative_score(fen), "White: +4");
    }

    #[test]
    fn test_placement_only_input() {
        assert_eq!(relative_score("4k3/8/8/8/8/8/8/4K2R"), "White: +5");
        assert_eq!(relative_score("4k3/8/8/8/8/8/8/4K3"), "White: 0, Black 0");
    }

    #[test]
    fn test_side_to_move_letters_are_ignored() {
        // The trailing "b" and castling letters must not count as a bishop.
        let fen = "4k3/8/8/8/8/8/8/4K3 b KQkq - 0 1";
        assert_eq!(material_totals(fen), (0, 0));
    }
}
