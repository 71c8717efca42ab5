use std::env;

use chess_core::render::DEFAULT_RENDER_BASE_URL;

#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres URL. Without one the bot keeps games in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub render_base_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            render_base_url: env::var("RENDER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_RENDER_BASE_URL.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}
