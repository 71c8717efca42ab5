/// Session orchestration tests: identity, turns, classification and
/// persistence driven through the public service API.
mod common;

use chess_bot::db::{GameFields, GameStore};
use chess_bot::error::GameError;
use chess_bot::session::{GameSession, OutcomeKind};
use chess_core::{Side, STARTING_FEN};

#[tokio::test]
async fn test_session_found_from_either_order() {
    let (store, service) = common::service();
    let suffix = common::unique_suffix();
    let (a, b) = (format!("A{suffix}"), format!("B{suffix}"));

    store.create(&format!("{a} vs {b}"), &a, &b, STARTING_FEN).await.unwrap();

    let ab = service.session(&a, &b).await.unwrap();
    let ba = service.session(&b, &a).await.unwrap();
    assert_eq!(ab, ba);
    assert_eq!(ab.white, a);

    // Same for a game stored the other way round.
    let (c, d) = (format!("C{suffix}"), format!("D{suffix}"));
    store.create(&format!("{d} vs {c}"), &d, &c, STARTING_FEN).await.unwrap();
    assert_eq!(service.session(&c, &d).await.unwrap().id, format!("{d} vs {c}"));
}

#[tokio::test]
async fn test_opening_move_scenario() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();

    let report = service.play_move("U1", "U2", "e4").await.unwrap();
    assert_eq!(report.outcome.kind, OutcomeKind::Continuing);
    assert_eq!(report.outcome.side_to_move, Side::Black);
    assert_eq!(report.outcome.material.as_deref(), Some("White: 0, Black 0"));

    let stored = store.find("U1 vs U2").await.unwrap().unwrap();
    assert_eq!(stored.game_fen, report.outcome.position);
    assert_eq!(report.session.fen, stored.game_fen);
}

#[tokio::test]
async fn test_checkmate_scenario_ends_the_game() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();
    store
        .update("U1 vs U2", GameFields::position(common::FOOLS_MATE_SETUP))
        .await
        .unwrap();

    let report = service.play_move("U2", "U1", "Qh4#").await.unwrap();
    assert_eq!(report.outcome.kind, OutcomeKind::Checkmate);
    assert_eq!(report.outcome.checked_square.as_deref(), Some("e1"));
    assert!(report.outcome.material.is_none());

    // The mated position stays stored and nobody may move again.
    let stored = store.find("U1 vs U2").await.unwrap().unwrap();
    assert_eq!(stored.game_fen, report.outcome.position);

    for (actor, opponent, mv) in [("U1", "U2", "a3"), ("U2", "U1", "a6")] {
        assert!(matches!(
            service.play_move(actor, opponent, mv).await,
            Err(GameError::GameOver)
        ));
    }
    assert_eq!(
        store.find("U1 vs U2").await.unwrap().unwrap().game_fen,
        report.outcome.position
    );
}

#[tokio::test]
async fn test_invalid_moves_never_write() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();
    let before = store.find("U1 vs U2").await.unwrap().unwrap();

    for mv in ["", "e5", "Nf6", "xyz", "e2e5", "O-O"] {
        assert!(matches!(
            service.play_move("U1", "U2", mv).await,
            Err(GameError::InvalidMove)
        ));
    }

    let after = store.find("U1 vs U2").await.unwrap().unwrap();
    assert_eq!(after.game_fen, before.game_fen);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_out_of_turn_and_outsiders_rejected() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();

    assert!(matches!(
        service.play_move("U2", "U1", "e5").await,
        Err(GameError::NotYourTurn)
    ));
    // A third player has no game with U1 at all.
    assert!(matches!(
        service.play_move("U3", "U1", "e4").await,
        Err(GameError::SessionNotFound)
    ));
    assert_eq!(
        store.find("U1 vs U2").await.unwrap().unwrap().game_fen,
        STARTING_FEN
    );
}

#[tokio::test]
async fn test_corrupt_position_surfaces_rules_error() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();
    store
        .update("U1 vs U2", GameFields::position("this is not a fen"))
        .await
        .unwrap();

    let err = service.play_move("U1", "U2", "e4").await.unwrap_err();
    assert!(matches!(err, GameError::Rules(_)));
    assert!(err.user_message().starts_with("Invalid FEN"));
    assert_eq!(
        store.find("U1 vs U2").await.unwrap().unwrap().game_fen,
        "this is not a fen"
    );
}

#[tokio::test]
async fn test_record_round_trip() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();
    let played = service.play_move("U1", "U2", "Nf3").await.unwrap();

    let reloaded = GameSession::from(store.find("U1 vs U2").await.unwrap().unwrap());
    assert_eq!(reloaded, played.session);
    assert_eq!(reloaded.side_of("U1"), Some(Side::White));

    // The reloaded position continues where it left off.
    let reply = service.play_move("U2", "U1", "Nf6").await.unwrap();
    assert_eq!(reply.outcome.kind, OutcomeKind::Continuing);
    assert_eq!(reply.outcome.side_to_move, Side::White);
}

#[tokio::test]
async fn test_stalemate_scenario_ends_the_game() {
    let (store, service) = common::service();
    service.challenge("U1", "U2").await.unwrap();
    store
        .update("U1 vs U2", GameFields::position(common::STALEMATE_SETUP))
        .await
        .unwrap();

    let report = service.play_move("U1", "U2", "Qf7").await.unwrap();
    assert_eq!(report.outcome.kind, OutcomeKind::Draw);
    assert!(report.outcome.checked_square.is_none());
    assert!(report.outcome.render_options().check.is_none());
    assert!(report.outcome.material.is_none());

    let stored = store.find("U1 vs U2").await.unwrap().unwrap();
    assert_eq!(stored.game_fen, report.outcome.position);

    for (actor, opponent, mv) in [("U2", "U1", "Kg8"), ("U1", "U2", "Qe7")] {
        assert!(matches!(
            service.play_move(actor, opponent, mv).await,
            Err(GameError::GameOver)
        ));
    }
    assert_eq!(
        store.find("U1 vs U2").await.unwrap().unwrap().game_fen,
        report.outcome.position
    );
}
