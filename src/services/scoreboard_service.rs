//! Operations invoked by the scoreboard UI. Reads degrade to an empty roster
//! when storage fails; mutations run as roster transactions and report storage
//! failures to the caller.

use std::{collections::BTreeMap, time::SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        roster::{
            AddPlayerResponse, EditingRosterResponse, RemovePlayerResponse,
            ResetRosterResponse, SaveEditsResponse,
        },
        scoreboard::ScoreboardResponse,
    },
    error::ServiceError,
    services::{
        roster_service::{self, Mutation, RosterSnapshot},
        sse_events,
    },
    state::{
        SharedState,
        roster::Roster,
        scoreboard::{self, RawRow},
    },
};

/// Rows for the editing form, padded with placeholders.
pub async fn load_roster_for_editing(state: &SharedState) -> EditingRosterResponse {
    let (roster, storage_available) = match roster_service::load_roster(state).await {
        Ok(roster) => (roster, true),
        Err(err) => {
            warn!(error = %err, "failed to load roster for editing; showing placeholders");
            (Roster::default(), false)
        }
    };

    let rows = scoreboard::editing_rows(&roster, state.config().editing_rows());
    EditingRosterResponse {
        storage_available,
        rows: rows.into_iter().map(Into::into).collect(),
    }
}

/// Replace the roster with the one described by the submitted rows.
pub async fn save_edits(
    state: &SharedState,
    edits: BTreeMap<usize, RawRow>,
) -> Result<SaveEditsResponse, ServiceError> {
    let submitted = edits.len();
    let committed = roster_service::transact(state, |_current| {
        Ok(Mutation::Write(scoreboard::apply_edits(&edits), ()))
    })
    .await?;

    info!(
        submitted,
        players = committed.roster.len(),
        "saved roster edits"
    );
    sse_events::broadcast_roster_changed(state, &committed.roster, committed.updated_at);
    Ok(committed.roster.into())
}

/// Append a zero-scored `Player N+1`.
pub async fn add_player(state: &SharedState) -> Result<AddPlayerResponse, ServiceError> {
    let committed = roster_service::transact(state, |current| {
        let mut next = current.clone();
        let added = scoreboard::add_player(&mut next);
        Ok(Mutation::Write(next, added))
    })
    .await?;

    let added = committed.value;
    info!(player_id = %added.id, name = %added.name, "player added");
    sse_events::broadcast_roster_changed(state, &committed.roster, committed.updated_at);
    Ok(AddPlayerResponse {
        success: true,
        added_name: added.name.clone(),
        player: added.into(),
    })
}

/// Remove the last player. An empty roster is reported, not written.
pub async fn remove_player(state: &SharedState) -> Result<RemovePlayerResponse, ServiceError> {
    let committed = roster_service::transact(state, |current| {
        let mut next = current.clone();
        Ok(match scoreboard::remove_last(&mut next) {
            Some(removed) => Mutation::Write(next, Some(removed)),
            None => Mutation::Skip(None),
        })
    })
    .await?;

    match committed.value {
        Some(removed) => {
            info!(player_id = %removed.id, name = %removed.name, "last player removed");
            sse_events::broadcast_roster_changed(state, &committed.roster, committed.updated_at);
            Ok(RemovePlayerResponse::removed(removed))
        }
        None => {
            info!("remove requested on an empty roster");
            Ok(RemovePlayerResponse::nothing_to_remove())
        }
    }
}

/// Remove the player carrying `id`, wherever it sits in the roster.
pub async fn remove_player_by_id(
    state: &SharedState,
    id: Uuid,
) -> Result<RemovePlayerResponse, ServiceError> {
    let committed = roster_service::transact(state, |current| {
        let mut next = current.clone();
        match next.remove_by_id(id) {
            Some(removed) => Ok(Mutation::Write(next, removed)),
            None => Err(ServiceError::NotFound(format!("player `{id}` not found"))),
        }
    })
    .await?;

    let removed = committed.value;
    info!(player_id = %removed.id, name = %removed.name, "player removed");
    sse_events::broadcast_roster_changed(state, &committed.roster, committed.updated_at);
    Ok(RemovePlayerResponse::removed(removed))
}

/// Wipe the roster regardless of its current revision.
pub async fn reset_roster(state: &SharedState) -> Result<ResetRosterResponse, ServiceError> {
    let reset_at = SystemTime::now();
    if !roster_service::replace_roster(state, Roster::default(), reset_at).await {
        return Err(ServiceError::NotPersisted("roster reset".into()));
    }

    sse_events::broadcast_roster_changed(state, &Roster::default(), Some(reset_at));
    Ok(ResetRosterResponse { success: true })
}

/// Ranked leaderboard, or the empty placeholder.
pub async fn get_ranked_scoreboard(state: &SharedState) -> ScoreboardResponse {
    let (snapshot, storage_available) = match roster_service::load_snapshot(state).await {
        Ok(snapshot) => (snapshot, true),
        Err(err) => {
            warn!(error = %err, "failed to load roster for scoreboard; showing placeholder");
            (RosterSnapshot::default(), false)
        }
    };

    ScoreboardResponse::build(
        scoreboard::rank(&snapshot.roster),
        scoreboard::leaders(&snapshot.roster),
        snapshot.updated_at,
        storage_available,
    )
}
