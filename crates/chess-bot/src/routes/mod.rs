pub mod commands;
pub mod games;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::commands::Bot;

pub fn router(bot: Arc<Bot>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat transport
        .route("/api/commands", post(commands::handle_command))
        // Game records
        .route("/api/games", get(games::list_games))
        .route("/api/games/{game_id}", get(games::get_game))
        // Shared state
        .layer(Extension(bot))
        .layer(TraceLayer::new_for_http())
}
