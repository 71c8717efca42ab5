use std::sync::Arc;

use axum::{Extension, Json};
use serde::Deserialize;

use crate::commands::{Bot, Reply};
use crate::error::AppError;

/// One chat message delivered by the transport.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Sender's chat user id.
    pub user: String,
    pub text: String,
}

/// POST /api/commands
///
/// Replies come back in posting order; an empty list means the message was
/// not a chess command.
pub async fn handle_command(
    Extension(bot): Extension<Arc<Bot>>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<Reply>, AppError> {
    let user = req.user.trim();
    if user.is_empty() {
        return Err(AppError::BadRequest("Missing sender".into()));
    }

    Ok(Json(bot.handle(user, &req.text).await))
}
