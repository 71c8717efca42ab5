use std::sync::Arc;

use chess_bot::commands::Bot;
use chess_bot::config;
use chess_bot::db::{self, GameStore, MemoryGameStore, PgGameStore};
use chess_bot::routes;
use chess_bot::session::GameService;

use chess_core::{LilaGifRenderer, ShakmatyRules};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let mut pool: Option<PgPool> = None;
    let store: Arc<dyn GameStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pg = db::pool::create_pool(url, config.db_max_connections).await?;

            tracing::info!("Running migrations...");
            db::pool::run_migrations(&pg).await?;

            pool = Some(pg.clone());
            Arc::new(PgGameStore::new(pg))
        }
        None => {
            tracing::warn!("DATABASE_URL not set - games are kept in memory and lost on restart");
            Arc::new(MemoryGameStore::new())
        }
    };

    let service = GameService::new(store, Arc::new(ShakmatyRules::new()));
    let renderer = Arc::new(LilaGifRenderer::new(config.render_base_url.clone()));
    let bot = Arc::new(Bot::new(service, renderer));

    let app = routes::router(bot);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Chess bot listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        tracing::info!("Closing database pool");
        pool.close().await;
    }

    Ok(())
}
