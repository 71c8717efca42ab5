use std::sync::Arc;

use chess_core::{RulesEngine, STARTING_FEN};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::db::{GameFields, GameFilter, GameStore};
use crate::error::{GameError, StoreError};

use super::classifier::{classify_move, MoveOutcome, OutcomeKind};
use super::identity::{canonical_pair_key, pair_key, resolve_session};
use super::turn::authorize;
use super::GameSession;

/// What a challenge did to the pair's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    Created,
    /// The pair already had a game in progress.
    Existing,
    /// The pair's finished game was reset to the starting position.
    Restarted,
}

/// Result of a challenge.
#[derive(Debug, Clone)]
pub struct ChallengeReport {
    pub session: GameSession,
    pub kind: ChallengeKind,
}

/// Result of an accepted move. The session already holds the new position.
#[derive(Debug, Clone)]
pub struct MoveReport {
    pub session: GameSession,
    pub outcome: MoveOutcome,
}

/// Entry point for everything that reads or changes a game.
///
/// Work on one player pair is serialized: the lookup, turn check,
/// classification and write for a move all happen under that pair's lock, so
/// two moves can never both be accepted against the same position. A lock
/// lives in the map only while some call holds it.
pub struct GameService {
    store: Arc<dyn GameStore>,
    rules: Arc<dyn RulesEngine>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, rules: Arc<dyn RulesEngine>) -> Self {
        Self {
            store,
            rules,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }

    pub fn rules(&self) -> &dyn RulesEngine {
        self.rules.as_ref()
    }

    fn pair_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the pair's lock once no other call holds a handle to it.
    fn release_pair_lock(&self, key: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks.remove_if(key, |_, m| Arc::strong_count(m) == 1);
    }

    /// Start a game with the challenger as white. An unfinished game for the
    /// pair is returned as is; a finished one is reset for a rematch.
    pub async fn challenge(
        &self,
        challenger: &str,
        opponent: &str,
    ) -> Result<ChallengeReport, GameError> {
        if challenger == opponent {
            return Err(GameError::SelfChallenge);
        }

        let key = canonical_pair_key(challenger, opponent);
        let lock = self.pair_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.challenge_locked(challenger, opponent).await
        };
        self.release_pair_lock(&key, lock);
        result
    }

    async fn challenge_locked(
        &self,
        challenger: &str,
        opponent: &str,
    ) -> Result<ChallengeReport, GameError> {
        let existing = match resolve_session(self.store(), challenger, opponent).await {
            Ok(session) => Some(session),
            Err(GameError::SessionNotFound) => None,
            Err(e) => return Err(e),
        };

        if let Some(session) = existing {
            if !self.rules.is_game_over(&session.fen)? {
                debug!(session_id = %session.id, "Challenge matched existing game");
                return Ok(ChallengeReport {
                    session,
                    kind: ChallengeKind::Existing,
                });
            }

            let fields = GameFields {
                white: Some(challenger.to_string()),
                black: Some(opponent.to_string()),
                game_fen: Some(STARTING_FEN.to_string()),
            };
            let record = self.store.update(&session.id, fields).await?;

            info!(session_id = %record.id, white = %challenger, black = %opponent, "Game restarted");
            return Ok(ChallengeReport {
                session: record.into(),
                kind: ChallengeKind::Restarted,
            });
        }

        let id = pair_key(challenger, opponent);
        let record = self
            .store
            .create(&id, challenger, opponent, STARTING_FEN)
            .await?;

        info!(session_id = %record.id, white = %challenger, black = %opponent, "Game created");
        Ok(ChallengeReport {
            session: record.into(),
            kind: ChallengeKind::Created,
        })
    }

    pub async fn session(&self, a: &str, b: &str) -> Result<GameSession, GameError> {
        resolve_session(self.store(), a, b).await
    }

    /// Every game `user` plays in, most recently active first.
    pub async fn games_for(&self, user: &str) -> Result<Vec<GameSession>, GameError> {
        let records = self
            .store
            .find_where(&GameFilter::Participant(user.to_string()))
            .await?;
        Ok(records.into_iter().map(GameSession::from).collect())
    }

    /// Play `move_text` for `actor` in their game against `opponent`.
    ///
    /// Pairs without a game are turned away before any lock is taken. Only an
    /// accepted move writes to the store, and only after it has been
    /// classified.
    pub async fn play_move(
        &self,
        actor: &str,
        opponent: &str,
        move_text: &str,
    ) -> Result<MoveReport, GameError> {
        resolve_session(self.store(), actor, opponent).await?;

        let key = canonical_pair_key(actor, opponent);
        let lock = self.pair_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.play_move_locked(actor, opponent, move_text).await
        };
        self.release_pair_lock(&key, lock);
        result
    }

    async fn play_move_locked(
        &self,
        actor: &str,
        opponent: &str,
        move_text: &str,
    ) -> Result<MoveReport, GameError> {
        // Re-read under the lock; an earlier move may have just landed.
        let mut session = resolve_session(self.store(), actor, opponent).await?;

        if let Err(e) = authorize(self.rules(), &session, actor)?.into_result() {
            warn!(session_id = %session.id, user = %actor, "Move rejected: {e}");
            return Err(e);
        }

        let outcome = classify_move(self.rules(), &session.fen, move_text)?;
        if outcome.kind == OutcomeKind::Invalid {
            warn!(session_id = %session.id, user = %actor, mv = %move_text, "Invalid move");
            return Err(GameError::InvalidMove);
        }

        let record = self
            .store
            .update(&session.id, GameFields::position(outcome.position.clone()))
            .await
            .map_err(|e: StoreError| {
                error!(session_id = %session.id, "Failed to save move: {e}");
                e
            })?;
        session.fen = record.game_fen;

        info!(
            session_id = %session.id,
            user = %actor,
            mv = %move_text,
            outcome = ?outcome.kind,
            "Move played"
        );
        Ok(MoveReport { session, outcome })
    }
}
