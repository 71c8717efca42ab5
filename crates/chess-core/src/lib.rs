//! Chess building blocks for the chat bot.
//!
//! Rules questions go through the [`rules::RulesEngine`] trait (backed by
//! shakmaty), material is scored straight off the FEN placement field, and
//! boards are turned into image URLs by a [`render::BoardRenderer`].

pub mod material;
pub mod render;
pub mod rules;

pub use material::{material_balance, relative_score, MaterialBalance};
pub use render::{BoardRenderer, LilaGifRenderer, RenderOptions};
pub use rules::{
    PieceKind, PlayedMove, RulesEngine, RulesError, ShakmatyRules, Side, SquarePiece,
    STARTING_FEN,
};
