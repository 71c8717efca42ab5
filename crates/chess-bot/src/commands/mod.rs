//! Chat command parsing.

pub mod handlers;

use std::sync::LazyLock;

use regex::Regex;

pub use handlers::{Bot, Reply};

static HELP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^chess$").unwrap());
static PLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^chess play(?:$|\s+(.*))$").unwrap());
static MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^chess (<@[^>]*>) move(?:$|\s+(.*))$").unwrap());
static BOARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^chess (<@[^>]*>) board$").unwrap());
static MOVES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^chess moves$").unwrap());
static GAMES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^chess games$").unwrap());
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@([^>|\s]+)(?:\|[^>]*)?>$").unwrap());

/// A recognised chess command. Opponent fields hold the raw mention text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Play { opponent: Option<String> },
    Move { opponent: String, mv: String },
    Board { opponent: String },
    Moves,
    Games,
}

/// Route a message to a command. Anything else is not for us.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();

    if HELP_RE.is_match(text) {
        return Some(Command::Help);
    }
    if let Some(caps) = PLAY_RE.captures(text) {
        let opponent = caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        return Some(Command::Play { opponent });
    }
    if let Some(caps) = MOVE_RE.captures(text) {
        return Some(Command::Move {
            opponent: caps[1].to_string(),
            mv: caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        });
    }
    if let Some(caps) = BOARD_RE.captures(text) {
        return Some(Command::Board {
            opponent: caps[1].to_string(),
        });
    }
    if MOVES_RE.is_match(text) {
        return Some(Command::Moves);
    }
    if GAMES_RE.is_match(text) {
        return Some(Command::Games);
    }
    None
}

/// User id from a chat mention: `<@U123>` or `<@U123|alice>`.
pub fn resolve_mention(mention: &str) -> Option<String> {
    MENTION_RE
        .captures(mention.trim())
        .map(|caps| caps[1].to_string())
}

pub fn mention(user: &str) -> String {
    format!("<@{user}>")
}
