//! Integration tests driving the scoreboard services against the in-memory roster store.

use std::{collections::BTreeMap, sync::Arc, time::SystemTime};

use minigame_scoreboard::{
    config::AppConfig,
    dao::roster_store::memory::MemoryRosterStore,
    dto::{roster::RemoveOutcome, scoreboard::ScoreboardResponse},
    error::ServiceError,
    services::scoreboard_service,
    state::{
        AppState, SharedState,
        roster::{Player, Roster},
        scoreboard::RawRow,
    },
};

fn state_with(store: &MemoryRosterStore) -> SharedState {
    AppState::with_store(AppConfig::default(), Arc::new(store.clone()))
}

fn seeded(players: Vec<Player>) -> MemoryRosterStore {
    MemoryRosterStore::with_roster(Roster::new(players).into_entity(SystemTime::now()))
}

fn player(name: &str, toss: u32, plinko: u32, fluff: u32) -> Player {
    Player {
        toss,
        plinko,
        fluff,
        ..Player::new(name)
    }
}

fn raw(name: &str, toss: &str, plinko: &str, fluff: &str) -> RawRow {
    RawRow {
        id: None,
        name: name.into(),
        toss: toss.into(),
        plinko: plinko.into(),
        fluff: fluff.into(),
    }
}

#[tokio::test]
async fn empty_store_offers_thirty_placeholders() {
    let store = MemoryRosterStore::new();
    let state = state_with(&store);

    let editing = scoreboard_service::load_roster_for_editing(&state).await;

    assert!(editing.storage_available);
    assert_eq!(editing.rows.len(), 30);
    assert_eq!(editing.rows[0].name, "Player 1");
    assert_eq!(editing.rows[29].name, "Player 30");
    assert!(editing.rows.iter().all(|row| row.id.is_none() && row.toss.is_none()));
}

#[tokio::test]
async fn removing_from_empty_roster_issues_no_write() {
    let store = MemoryRosterStore::new();
    let state = state_with(&store);

    let response = scoreboard_service::remove_player(&state).await.unwrap();

    assert!(!response.success);
    assert_eq!(response.outcome, RemoveOutcome::NothingToRemove);
    assert!(response.removed_name.is_none());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn add_then_remove_restores_roster() {
    let store = seeded(vec![player("A", 1, 2, 3)]);
    let state = state_with(&store);

    let added = scoreboard_service::add_player(&state).await.unwrap();
    assert!(added.success);
    assert_eq!(added.added_name, "Player 2");
    assert_eq!(added.player.toss, 0);

    let removed = scoreboard_service::remove_player(&state).await.unwrap();
    assert_eq!(removed.outcome, RemoveOutcome::Removed);
    assert_eq!(removed.removed_name.as_deref(), Some("Player 2"));

    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    assert_eq!(editing.rows[0].name, "A");
    assert_eq!(editing.rows[0].fluff, Some(3));
    assert!(editing.rows[1].id.is_none());
}

#[tokio::test]
async fn saving_edits_drops_blank_names_and_parses_leniently() {
    let store = MemoryRosterStore::new();
    let state = state_with(&store);

    let edits = BTreeMap::from([(0, raw("  ", "3", "4", "5")), (1, raw("Bob", "x", "2", ""))]);
    let saved = scoreboard_service::save_edits(&state, edits).await.unwrap();

    assert!(saved.success);
    assert_eq!(saved.players.len(), 1);
    let bob = &saved.players[0];
    assert_eq!(
        (bob.name.as_str(), bob.toss, bob.plinko, bob.fluff),
        ("Bob", 0, 2, 0)
    );
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn identical_submissions_keep_player_ids() {
    let store = MemoryRosterStore::new();
    let state = state_with(&store);

    let edits = BTreeMap::from([(0, raw("Ann", "1", "1", "1"))]);
    let first = scoreboard_service::save_edits(&state, edits.clone()).await.unwrap();
    let second = scoreboard_service::save_edits(&state, edits).await.unwrap();

    assert_eq!(first.players[0].id, second.players[0].id);
}

#[tokio::test]
async fn ranking_breaks_ties_by_roster_order() {
    let store = seeded(vec![
        player("A", 10, 5, 0),
        player("B", 10, 5, 0),
        player("C", 1, 1, 1),
    ]);
    let state = state_with(&store);

    let ScoreboardResponse::Ranked {
        entries,
        leaders,
        updated_at,
        storage_available,
    } = scoreboard_service::get_ranked_scoreboard(&state).await
    else {
        panic!("expected a ranked scoreboard");
    };

    assert!(storage_available);
    assert!(updated_at.is_some());
    let ranked: Vec<_> = entries
        .iter()
        .map(|entry| (entry.rank, entry.name.as_str(), entry.total))
        .collect();
    assert_eq!(ranked, vec![(1, "A", 15), (2, "B", 15), (3, "C", 3)]);
    assert_eq!(leaders[0].name, "A");
    assert_eq!(leaders[2].name, "C");
}

#[tokio::test]
async fn empty_roster_shows_placeholder_message() {
    let state = state_with(&MemoryRosterStore::new());

    let response = scoreboard_service::get_ranked_scoreboard(&state).await;
    assert!(matches!(
        response,
        ScoreboardResponse::Empty {
            storage_available: true,
            ..
        }
    ));
}

#[tokio::test]
async fn offline_store_degrades_reads_and_rejects_writes() {
    let store = seeded(vec![player("Keep", 1, 1, 1)]);
    let state = state_with(&store);
    store.set_offline(true);

    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    assert!(!editing.storage_available);
    assert_eq!(editing.rows.len(), 30);
    assert_eq!(editing.rows[0].name, "Player 1");

    assert!(matches!(
        scoreboard_service::get_ranked_scoreboard(&state).await,
        ScoreboardResponse::Empty {
            storage_available: false,
            ..
        }
    ));
    assert!(matches!(
        scoreboard_service::add_player(&state).await,
        Err(ServiceError::Unavailable(_))
    ));
    assert!(matches!(
        scoreboard_service::reset_roster(&state).await,
        Err(ServiceError::NotPersisted(_))
    ));

    store.set_offline(false);
    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    assert_eq!(editing.rows[0].name, "Keep");
}

#[tokio::test]
async fn degraded_state_rejects_mutations() {
    let state = AppState::new(AppConfig::default());

    assert!(matches!(
        scoreboard_service::remove_player(&state).await,
        Err(ServiceError::Degraded)
    ));
    assert!(!scoreboard_service::load_roster_for_editing(&state).await.storage_available);
}

#[tokio::test]
async fn remove_by_id_targets_one_player() {
    let keep = player("Keep", 0, 0, 0);
    let drop = player("Drop", 0, 0, 0);
    let drop_id = drop.id;
    let store = seeded(vec![drop, keep]);
    let state = state_with(&store);

    let removed = scoreboard_service::remove_player_by_id(&state, drop_id)
        .await
        .unwrap();
    assert_eq!(removed.removed_name.as_deref(), Some("Drop"));

    assert!(matches!(
        scoreboard_service::remove_player_by_id(&state, drop_id).await,
        Err(ServiceError::NotFound(_))
    ));
    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    assert_eq!(editing.rows[0].name, "Keep");
}

#[tokio::test]
async fn reset_clears_roster() {
    let store = seeded(vec![player("A", 1, 0, 0), player("B", 2, 0, 0)]);
    let state = state_with(&store);

    let response = scoreboard_service::reset_roster(&state).await.unwrap();
    assert!(response.success);
    assert!(matches!(
        scoreboard_service::get_ranked_scoreboard(&state).await,
        ScoreboardResponse::Empty { .. }
    ));
}

#[tokio::test]
async fn writes_are_announced_on_public_stream() {
    let store = MemoryRosterStore::new();
    let state = state_with(&store);
    let mut receiver = state.public_sse().subscribe();

    scoreboard_service::add_player(&state).await.unwrap();

    let event = receiver.recv().await.unwrap();
    assert_eq!(event.event, "roster.changed");
    let body: serde_json::Value = serde_json::from_str(&event.data).unwrap();
    assert_eq!(body["entries"][0]["name"], "Player 1");
}

#[tokio::test]
async fn announced_scoreboard_matches_persisted_write_time() {
    let store = seeded(vec![player("A", 2, 0, 0)]);
    let state = state_with(&store);
    let mut receiver = state.public_sse().subscribe();

    scoreboard_service::add_player(&state).await.unwrap();

    let event = receiver.recv().await.unwrap();
    let announced: serde_json::Value = serde_json::from_str(&event.data).unwrap();
    let served = serde_json::to_value(scoreboard_service::get_ranked_scoreboard(&state).await).unwrap();
    assert_eq!(announced, served);

    let stored = store.snapshot().await.unwrap();
    assert_eq!(stored.roster.players.len(), 2);
}

#[tokio::test]
async fn add_survives_concurrent_writer() {
    let store = seeded(vec![player("A", 0, 0, 0)]);
    let state = state_with(&store);
    store.interfere_with_next_writes(1);

    let added = scoreboard_service::add_player(&state).await.unwrap();

    assert_eq!(added.added_name, "Player 2");
    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    assert_eq!(editing.rows[1].name, "Player 2");
    assert!(editing.rows[1].id.is_some());
}

#[tokio::test]
async fn configured_row_count_pads_editing_form() {
    let store = seeded(vec![player("A", 0, 0, 0), player("B", 0, 0, 0)]);
    let state = AppState::with_store(
        AppConfig::default().with_editing_rows(5),
        Arc::new(store.clone()),
    );

    let editing = scoreboard_service::load_roster_for_editing(&state).await;
    let names: Vec<_> = editing.rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "Player 3", "Player 4", "Player 5"]);
}
