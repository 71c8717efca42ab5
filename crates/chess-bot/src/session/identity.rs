//! Game ids for player pairs.
//!
//! Stored ids are `"<challenger> vs <opponent>"` and keep whichever order the
//! game was created in, so every lookup tries both orders.

use crate::db::{GameFilter, GameStore};
use crate::error::GameError;

use super::GameSession;

pub fn pair_key(a: &str, b: &str) -> String {
    format!("{a} vs {b}")
}

/// Same key for `(a, b)` and `(b, a)`.
pub fn canonical_pair_key(a: &str, b: &str) -> String {
    if a <= b {
        pair_key(a, b)
    } else {
        pair_key(b, a)
    }
}

/// Matches a stored id in either orientation.
pub fn pair_filter(a: &str, b: &str) -> GameFilter {
    GameFilter::Any(vec![
        GameFilter::IdEquals(pair_key(a, b)),
        GameFilter::IdEquals(pair_key(b, a)),
    ])
}

pub async fn resolve_session(
    store: &dyn GameStore,
    a: &str,
    b: &str,
) -> Result<GameSession, GameError> {
    store
        .find_where(&pair_filter(a, b))
        .await?
        .into_iter()
        .next()
        .map(GameSession::from)
        .ok_or(GameError::SessionNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGameStore;
    use chess_core::STARTING_FEN;

    #[test]
    fn test_canonical_key_is_order_independent() {
        assert_eq!(canonical_pair_key("U1", "U2"), canonical_pair_key("U2", "U1"));
        assert_eq!(canonical_pair_key("U2", "U1"), "U1 vs U2");
        assert_eq!(pair_key("U2", "U1"), "U2 vs U1");
    }

    #[tokio::test]
    async fn test_resolve_either_order() {
        let store = MemoryGameStore::new();
        store.create("A vs B", "A", "B", STARTING_FEN).await.unwrap();

        let ab = resolve_session(&store, "A", "B").await.unwrap();
        let ba = resolve_session(&store, "B", "A").await.unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.id, "A vs B");
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let store = MemoryGameStore::new();
        store.create("A vs B", "A", "B", STARTING_FEN).await.unwrap();

        let missing = resolve_session(&store, "A", "C").await;
        assert!(matches!(missing, Err(GameError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_ignores_ids_that_merely_contain_the_pair() {
        let store = MemoryGameStore::new();
        store.create("XA vs B", "XA", "B", STARTING_FEN).await.unwrap();

        let missing = resolve_session(&store, "A", "B").await;
        assert!(matches!(missing, Err(GameError::SessionNotFound)));
    }
}
