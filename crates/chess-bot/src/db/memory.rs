use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::{GameFields, GameFilter, GameRecord, GameStore};
use crate::error::StoreError;

/// Process-local store. Used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: RwLock<HashMap<String, GameRecord>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, GameRecord>> {
        self.games.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, GameRecord>> {
        self.games.write().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(
        games: &mut HashMap<String, GameRecord>,
        id: &str,
        white: &str,
        black: &str,
        game_fen: &str,
    ) -> Result<GameRecord, StoreError> {
        if games.contains_key(id) || games.values().any(|g| g.has_pair(white, black)) {
            return Err(StoreError::Duplicate(id.to_string()));
        }

        let record = GameRecord {
            id: id.to_string(),
            white: white.to_string(),
            black: black.to_string(),
            game_fen: game_fen.to_string(),
            updated_at: Utc::now(),
        };
        games.insert(id.to_string(), record.clone());
        Ok(record)
    }
}

fn newest_first(mut records: Vec<GameRecord>) -> Vec<GameRecord> {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
    records
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn find(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.read().get(id).cloned())
    }

    async fn find_where(&self, filter: &GameFilter) -> Result<Vec<GameRecord>, StoreError> {
        let matched = self
            .read()
            .values()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect();
        Ok(newest_first(matched))
    }

    async fn all(&self) -> Result<Vec<GameRecord>, StoreError> {
        Ok(newest_first(self.read().values().cloned().collect()))
    }

    async fn create(
        &self,
        id: &str,
        white: &str,
        black: &str,
        game_fen: &str,
    ) -> Result<GameRecord, StoreError> {
        Self::insert(&mut self.write(), id, white, black, game_fen)
    }

    async fn update(&self, id: &str, fields: GameFields) -> Result<GameRecord, StoreError> {
        let mut games = self.write();

        if let Some(record) = games.get_mut(id) {
            if let Some(white) = fields.white {
                record.white = white;
            }
            if let Some(black) = fields.black {
                record.black = black;
            }
            if let Some(game_fen) = fields.game_fen {
                record.game_fen = game_fen;
            }
            record.updated_at = Utc::now();
            return Ok(record.clone());
        }

        let (white, black, game_fen) = fields
            .complete()
            .ok_or_else(|| StoreError::Incomplete(id.to_string()))?;
        Self::insert(&mut games, id, white, black, game_fen)
    }
}
