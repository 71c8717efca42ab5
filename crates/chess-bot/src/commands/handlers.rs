use std::sync::Arc;

use chess_core::{BoardRenderer, RenderOptions, Side};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::GameError;
use crate::session::{
    ChallengeKind, GameService, GameSession, MoveReport, OutcomeKind, TurnState,
};

use super::{mention, parse_command, resolve_mention, Command};

const HELP_TEXT: &str = "Chess commands:
`chess play @opponent` - challenge someone (you play white)
`chess @opponent move <move>` - make a move, e.g. `e4`, `Nf3`, `O-O` or `e2e4`
`chess @opponent board` - show the board
`chess moves` - list your legal moves
`chess games` - list your games";

/// Messages to post back, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub messages: Vec<String>,
}

impl Reply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    fn push(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Game state of a stored session, for display.
enum Status {
    ToMove { side: Side, in_check: bool },
    Checkmate { winner: Side },
    Drawn,
}

/// Command boundary: turns a chat message into replies. Errors never escape;
/// they become reply text.
pub struct Bot {
    service: GameService,
    renderer: Arc<dyn BoardRenderer>,
}

impl Bot {
    pub fn new(service: GameService, renderer: Arc<dyn BoardRenderer>) -> Self {
        Self { service, renderer }
    }

    pub fn service(&self) -> &GameService {
        &self.service
    }

    pub async fn handle(&self, user: &str, text: &str) -> Reply {
        let Some(command) = parse_command(text) else {
            return Reply::default();
        };
        info!(user = %user, command = ?command, "Chess command");

        let result = match command {
            Command::Help => Ok(Reply::text(HELP_TEXT)),
            Command::Play { opponent } => self.play(user, opponent.as_deref()).await,
            Command::Move { opponent, mv } => self.make_move(user, &opponent, &mv).await,
            Command::Board { opponent } => self.board(user, &opponent).await,
            Command::Moves => self.moves(user).await,
            Command::Games => self.games(user).await,
        };

        result.unwrap_or_else(|e| {
            if let GameError::Store(inner) = &e {
                error!(user = %user, "Store failure: {inner}");
            }
            Reply::text(e.user_message())
        })
    }

    async fn play(&self, user: &str, opponent: Option<&str>) -> Result<Reply, GameError> {
        let opponent = opponent
            .and_then(resolve_mention)
            .ok_or(GameError::MissingOpponent)?;

        let report = self.service.challenge(user, &opponent).await?;
        let session = &report.session;

        let players = format!(
            "{} (white) vs {} (black)",
            mention(&session.white),
            mention(&session.black)
        );
        let headline = match report.kind {
            ChallengeKind::Created => format!("{players} - game on!"),
            ChallengeKind::Restarted => format!("Rematch! {players} - game on!"),
            ChallengeKind::Existing => {
                format!("You already have a game with {}!", mention(&opponent))
            }
        };

        let status = self.status(session)?;
        Ok(Reply::text(headline)
            .push(self.status_line(session, &status))
            .push(self.board_url(session, &status)?))
    }

    async fn make_move(&self, user: &str, opponent: &str, mv: &str) -> Result<Reply, GameError> {
        let opponent = resolve_mention(opponent).ok_or(GameError::MissingOpponent)?;
        let MoveReport { session, outcome } = self.service.play_move(user, &opponent, mv).await?;

        let next = mention(session.player(outcome.side_to_move));
        let score = outcome.material.as_deref().unwrap_or_default();
        let headline = match outcome.kind {
            OutcomeKind::Checkmate => "You win!".to_string(),
            OutcomeKind::Draw => "Draw!".to_string(),
            OutcomeKind::Check => format!("Check - {next} it's your turn! Score: {score}"),
            OutcomeKind::Continuing => format!("{next} your turn! Score: {score}"),
            OutcomeKind::Invalid => return Err(GameError::InvalidMove),
        };

        let url = self
            .renderer
            .render_url(&outcome.position, &outcome.render_options());
        Ok(Reply::text(headline).push(url))
    }

    async fn board(&self, user: &str, opponent: &str) -> Result<Reply, GameError> {
        let opponent = resolve_mention(opponent).ok_or(GameError::MissingOpponent)?;
        let session = self.service.session(user, &opponent).await?;

        let status = self.status(&session)?;
        Ok(Reply::text(self.status_line(&session, &status)).push(self.board_url(&session, &status)?))
    }

    async fn moves(&self, user: &str) -> Result<Reply, GameError> {
        let rules = self.service.rules();
        let mut lines = Vec::new();

        for session in self.service.games_for(user).await? {
            let Ok(Status::ToMove { side, .. }) = self.readable_status(&session) else {
                continue;
            };
            if session.player(side) != user {
                continue;
            }
            let Ok(legal) = rules.legal_moves(&session.fen) else {
                continue;
            };
            lines.push(format!(
                "vs {}: {}",
                mention(session.opponent_of(user)),
                legal.join(", ")
            ));
        }

        if lines.is_empty() {
            return Ok(Reply::text("It's not your turn in any game"));
        }
        Ok(Reply::text(lines.join("\n")))
    }

    async fn games(&self, user: &str) -> Result<Reply, GameError> {
        let sessions = self.service.games_for(user).await?;
        if sessions.is_empty() {
            return Ok(Reply::text(
                "You don't have any games - try challenging someone with `chess play @opponent`",
            ));
        }

        let mut lines = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let colour = match session.side_of(user) {
                Some(Side::White) => "white",
                _ => "black",
            };
            let state = match self.readable_status(session) {
                Ok(Status::ToMove { side, .. }) if session.player(side) == user => "your turn",
                Ok(Status::ToMove { .. }) => "their turn",
                Ok(Status::Checkmate { winner }) if session.player(winner) == user => "you won",
                Ok(Status::Checkmate { .. }) => "you lost",
                Ok(Status::Drawn) => "drawn",
                Err(_) => "position unreadable",
            };
            lines.push(format!(
                "vs {} (you play {colour}) - {state}",
                mention(session.opponent_of(user))
            ));
        }
        Ok(Reply::text(lines.join("\n")))
    }

    fn status(&self, session: &GameSession) -> Result<Status, GameError> {
        let rules = self.service.rules();
        let side = TurnState::of(rules, session)?.side();

        if rules.is_checkmate(&session.fen)? {
            Ok(Status::Checkmate { winner: side.opposite() })
        } else if rules.is_game_over(&session.fen)? {
            Ok(Status::Drawn)
        } else {
            Ok(Status::ToMove {
                side,
                in_check: rules.is_check(&session.fen)?,
            })
        }
    }

    /// Status for listings, where one bad record must not hide the rest.
    fn readable_status(&self, session: &GameSession) -> Result<Status, GameError> {
        self.status(session).inspect_err(|e| {
            warn!(session_id = %session.id, "Skipping unreadable game: {e}");
        })
    }

    fn status_line(&self, session: &GameSession, status: &Status) -> String {
        match status {
            Status::ToMove { side, in_check: true } => {
                format!("Check - {} it's your turn!", mention(session.player(*side)))
            }
            Status::ToMove { side, .. } => {
                format!("{} it's your turn!", mention(session.player(*side)))
            }
            Status::Checkmate { winner } => {
                format!("Checkmate - {} won!", mention(session.player(*winner)))
            }
            Status::Drawn => "Draw!".to_string(),
        }
    }

    fn board_url(&self, session: &GameSession, status: &Status) -> Result<String, GameError> {
        let rules = self.service.rules();
        let to_move = rules.side_to_move(&session.fen)?;
        let check = match status {
            Status::ToMove { in_check: true, .. } | Status::Checkmate { .. } => {
                rules.king_square(&session.fen, to_move)?
            }
            _ => None,
        };

        let options = RenderOptions {
            flip_board: to_move == Side::Black,
            last_move: None,
            check,
        };
        Ok(self.renderer.render_url(&session.fen, &options))
    }
}
