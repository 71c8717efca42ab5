use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::RulesError;
use serde_json::json;

/// Failures of the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("A game already exists for {0}")]
    Duplicate(String),

    #[error("Cannot create game {0} without both players and a position")]
    Incomplete(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Why a single chat command could not be carried out.
///
/// The `Display` text is what the player sees.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("No game found - try challenging someone with `chess play @opponent`")]
    SessionNotFound,

    #[error("It's not your turn!")]
    NotYourTurn,

    #[error("Invalid move")]
    InvalidMove,

    #[error("This game is over - start a new one with `chess play @opponent`")]
    GameOver,

    #[error("You can't play against yourself!")]
    SelfChallenge,

    #[error("Mention your opponent, e.g. `chess play @opponent`")]
    MissingOpponent,

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    /// Text for the chat reply. Store failures stay out of chat.
    pub fn user_message(&self) -> String {
        match self {
            GameError::Store(_) => {
                "Something went wrong saving the game, please try again".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Anyhow(e) => {
                tracing::error!("Unexpected error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(GameError::NotYourTurn.user_message(), "It's not your turn!");
        assert_eq!(GameError::InvalidMove.user_message(), "Invalid move");
        assert_eq!(
            GameError::Rules(RulesError::InvalidFen("bad".into())).user_message(),
            "Invalid FEN: bad"
        );
        assert!(!GameError::Store(StoreError::Duplicate("A vs B".into()))
            .user_message()
            .contains("A vs B"));
    }

    #[test]
    fn test_app_error_status() {
        let resp = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::NotFound("gone".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
