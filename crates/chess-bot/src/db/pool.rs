use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run the Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- One row per two-player game. The id is "<challenger> vs <opponent>".
CREATE TABLE IF NOT EXISTS chess_games (
    id          TEXT PRIMARY KEY,
    white       TEXT NOT NULL,
    black       TEXT NOT NULL,
    game_fen    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one game per unordered pair of players
CREATE UNIQUE INDEX IF NOT EXISTS idx_chess_games_pair
    ON chess_games (LEAST(white, black), GREATEST(white, black));
CREATE INDEX IF NOT EXISTS idx_chess_games_white ON chess_games (white);
CREATE INDEX IF NOT EXISTS idx_chess_games_black ON chess_games (black);
"#;
