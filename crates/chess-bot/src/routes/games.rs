use std::sync::Arc;

use axum::{extract::Path, extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::commands::Bot;
use crate::db::GameFilter;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct GamesQuery {
    pub user: Option<String>,
}

/// GET /api/games
pub async fn list_games(
    Extension(bot): Extension<Arc<Bot>>,
    Query(q): Query<GamesQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let store = bot.service().store();
    let games = match q.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => store.find_where(&GameFilter::Participant(user.to_string())).await?,
        None => store.all().await?,
    };

    Ok(Json(serde_json::json!({
        "games": games,
        "total": games.len(),
    })))
}

/// GET /api/games/{game_id}
pub async fn get_game(
    Extension(bot): Extension<Arc<Bot>>,
    Path(game_id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let game = bot
        .service()
        .store()
        .find(&game_id)
        .await?
        .ok_or(AppError::NotFound("Game not found".into()))?;

    Ok(Json(serde_json::to_value(game).map_err(anyhow::Error::from)?))
}
