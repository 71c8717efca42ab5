use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{GameFields, GameFilter, GameRecord, GameStore};
use crate::error::StoreError;

type GameRow = (String, String, String, String, DateTime<Utc>);

const RETURNING: &str = "RETURNING id, white, black, game_fen, updated_at";

fn into_record((id, white, black, game_fen, updated_at): GameRow) -> GameRecord {
    GameRecord {
        id,
        white,
        black,
        game_fen,
        updated_at,
    }
}

/// Compile a filter into a WHERE fragment, pushing each value onto `params`
/// and referring to it by placeholder.
fn filter_sql(filter: &GameFilter, params: &mut Vec<String>) -> String {
    match filter {
        GameFilter::IdEquals(id) => {
            params.push(id.clone());
            format!("id = ${}", params.len())
        }
        GameFilter::IdContains(part) => {
            // strpos rather than LIKE so '%' and '_' in ids match literally
            params.push(part.clone());
            format!("strpos(id, ${}) > 0", params.len())
        }
        GameFilter::Participant(user) => {
            params.push(user.clone());
            let n = params.len();
            format!("(white = ${n} OR black = ${n})")
        }
        GameFilter::Any(filters) if filters.is_empty() => "FALSE".to_string(),
        GameFilter::Any(filters) => {
            let clauses: Vec<String> = filters.iter().map(|f| filter_sql(f, params)).collect();
            format!("({})", clauses.join(" OR "))
        }
    }
}

/// Postgres-backed [`GameStore`].
#[derive(Clone, Debug)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the underlying pool; further calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn find(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let row: Option<GameRow> = sqlx::query_as(
            "SELECT id, white, black, game_fen, updated_at FROM chess_games WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_record))
    }

    async fn find_where(&self, filter: &GameFilter) -> Result<Vec<GameRecord>, StoreError> {
        let mut params = Vec::new();
        let where_clause = filter_sql(filter, &mut params);

        let query = format!(
            r#"SELECT id, white, black, game_fen, updated_at
               FROM chess_games
               WHERE {where_clause}
               ORDER BY updated_at DESC, id"#
        );

        let mut q = sqlx::query_as::<_, GameRow>(&query);
        for p in &params {
            q = q.bind(p.clone());
        }
        let rows = q.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(into_record).collect())
    }

    async fn all(&self) -> Result<Vec<GameRecord>, StoreError> {
        let rows: Vec<GameRow> = sqlx::query_as(
            "SELECT id, white, black, game_fen, updated_at FROM chess_games ORDER BY updated_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_record).collect())
    }

    async fn create(
        &self,
        id: &str,
        white: &str,
        black: &str,
        game_fen: &str,
    ) -> Result<GameRecord, StoreError> {
        // Conflicts on either the id or the pair index leave the row alone
        let query = format!(
            r#"INSERT INTO chess_games (id, white, black, game_fen)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT DO NOTHING
               {RETURNING}"#
        );

        let row: Option<GameRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(white)
            .bind(black)
            .bind(game_fen)
            .fetch_optional(&self.pool)
            .await?;

        row.map(into_record)
            .ok_or_else(|| StoreError::Duplicate(id.to_string()))
    }

    async fn update(&self, id: &str, fields: GameFields) -> Result<GameRecord, StoreError> {
        let query = format!(
            r#"UPDATE chess_games SET
                   white = COALESCE($2, white),
                   black = COALESCE($3, black),
                   game_fen = COALESCE($4, game_fen),
                   updated_at = NOW()
               WHERE id = $1
               {RETURNING}"#
        );

        let row: Option<GameRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(fields.white.as_deref())
            .bind(fields.black.as_deref())
            .bind(fields.game_fen.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Ok(into_record(row));
        }

        let (white, black, game_fen) = fields
            .complete()
            .ok_or_else(|| StoreError::Incomplete(id.to_string()))?;
        self.create(id, white, black, game_fen).await
    }
}
