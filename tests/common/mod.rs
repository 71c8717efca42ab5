#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chess_bot::commands::Bot;
use chess_bot::db::MemoryGameStore;
use chess_bot::session::GameService;
use chess_core::{LilaGifRenderer, ShakmatyRules};

/// Fool's mate, black to play Qh4#.
pub const FOOLS_MATE_SETUP: &str =
    "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";

/// White to play Qf7, stalemating the black king.
pub const STALEMATE_SETUP: &str = "7k/4Q3/6K1/8/8/8/8/8 w - - 0 1";

/// Service over a fresh in-memory store.
pub fn service() -> (Arc<MemoryGameStore>, GameService) {
    let store = Arc::new(MemoryGameStore::new());
    let service = GameService::new(store.clone(), Arc::new(ShakmatyRules::new()));
    (store, service)
}

pub fn bot() -> Bot {
    bot_with_store().1
}

/// Bot plus a handle on its store, for seeding positions.
pub fn bot_with_store() -> (Arc<MemoryGameStore>, Bot) {
    let (store, service) = service();
    (store, Bot::new(service, Arc::new(LilaGifRenderer::default())))
}

/// Generate a unique suffix based on timestamp to keep player ids apart.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}
