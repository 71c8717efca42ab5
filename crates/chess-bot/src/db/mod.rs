//! Game record storage.
//!
//! The bot talks to storage through [`GameStore`]; the handle is built once in
//! `main` and passed down, never reached through a global.

pub mod games;
pub mod memory;
pub mod pool;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreError;

pub use games::PgGameStore;
pub use memory::MemoryGameStore;

/// A persisted game, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// `"<challenger> vs <opponent>"`, in whichever order the game was created.
    pub id: String,
    pub white: String,
    pub black: String,
    pub game_fen: String,
    pub updated_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn has_pair(&self, a: &str, b: &str) -> bool {
        (self.white == a && self.black == b) || (self.white == b && self.black == a)
    }
}

/// Partial update of a record. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFields {
    pub white: Option<String>,
    pub black: Option<String>,
    pub game_fen: Option<String>,
}

impl GameFields {
    pub fn position(fen: impl Into<String>) -> Self {
        Self {
            game_fen: Some(fen.into()),
            ..Self::default()
        }
    }

    /// All three columns present, enough to insert a missing record.
    fn complete(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.white.as_deref()?,
            self.black.as_deref()?,
            self.game_fen.as_deref()?,
        ))
    }
}

/// Structured record predicate. Values are always bound as parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameFilter {
    IdEquals(String),
    IdContains(String),
    /// Either colour is this player.
    Participant(String),
    /// Any of the inner filters. Empty matches nothing.
    Any(Vec<GameFilter>),
}

impl GameFilter {
    pub fn matches(&self, record: &GameRecord) -> bool {
        match self {
            GameFilter::IdEquals(id) => record.id == *id,
            GameFilter::IdContains(part) => record.id.contains(part.as_str()),
            GameFilter::Participant(user) => record.white == *user || record.black == *user,
            GameFilter::Any(filters) => filters.iter().any(|f| f.matches(record)),
        }
    }
}

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<GameRecord>, StoreError>;

    /// Matching records, most recently updated first.
    async fn find_where(&self, filter: &GameFilter) -> Result<Vec<GameRecord>, StoreError>;

    async fn all(&self) -> Result<Vec<GameRecord>, StoreError>;

    /// Insert a new game at the given position. Fails with
    /// [`StoreError::Duplicate`] if the id or the player pair already exists.
    async fn create(
        &self,
        id: &str,
        white: &str,
        black: &str,
        game_fen: &str,
    ) -> Result<GameRecord, StoreError>;

    /// Apply `fields` to an existing record, or insert it when absent and
    /// `fields` carries every column.
    async fn update(&self, id: &str, fields: GameFields) -> Result<GameRecord, StoreError>;

    async fn find_or_create(
        &self,
        id: &str,
        white: &str,
        black: &str,
        game_fen: &str,
    ) -> Result<GameRecord, StoreError> {
        match self.find(id).await? {
            Some(record) => Ok(record),
            None => self.create(id, white, black, game_fen).await,
        }
    }
}
