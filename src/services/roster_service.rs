//! Boundary between the scoreboard services and the roster store.
//!
//! Every mutation goes through [`transact`]: the current document is loaded with
//! its revision, a pure apply function computes the next roster, and the result
//! is written back only if nobody else wrote in between. Conflicts restart the
//! cycle; any other storage failure discards the computed roster.

use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::{
    error::ServiceError,
    state::{SharedState, roster::Roster},
};

/// Outcome of an apply function.
pub enum Mutation<T> {
    /// Persist the new roster and hand `T` back to the caller.
    Write(Roster, T),
    /// Leave the store untouched.
    Skip(T),
}

/// Result of a finished transaction.
#[derive(Debug)]
pub struct Committed<T> {
    /// Whatever the apply function returned.
    pub value: T,
    /// Roster as it stands after the transaction.
    pub roster: Roster,
    /// Whether a write was issued.
    pub written: bool,
    /// Write time recorded in the document the roster was taken from.
    pub updated_at: Option<SystemTime>,
}

/// Roster together with the time it was last written.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    /// Players as persisted.
    pub roster: Roster,
    /// Last write time; `None` when no document exists.
    pub updated_at: Option<SystemTime>,
}

/// Load the persisted roster; a missing document is an empty roster.
pub async fn load_roster(state: &SharedState) -> Result<Roster, ServiceError> {
    Ok(load_snapshot(state).await?.roster)
}

/// Load the persisted roster along with its last write time.
pub async fn load_snapshot(state: &SharedState) -> Result<RosterSnapshot, ServiceError> {
    let store = state.require_roster_store().await?;
    let snapshot = match store.load().await? {
        Some(stored) => RosterSnapshot {
            updated_at: Some(stored.roster.updated_at),
            roster: stored.roster.into(),
        },
        None => RosterSnapshot::default(),
    };
    Ok(snapshot)
}

/// Overwrite the persisted roster unconditionally, stamping it with `updated_at`.
///
/// Failures are logged and reported as `false`; the previously persisted
/// document stays authoritative.
pub async fn replace_roster(state: &SharedState, roster: Roster, updated_at: SystemTime) -> bool {
    let store = match state.require_roster_store().await {
        Ok(store) => store,
        Err(err) => {
            warn!(error = %err, "cannot replace roster without storage");
            return false;
        }
    };

    let players = roster.len();
    match store.replace(roster.into_entity(updated_at)).await {
        Ok(revision) => {
            info!(players, %revision, "roster replaced");
            true
        }
        Err(err) => {
            warn!(error = %err, "failed to replace roster");
            false
        }
    }
}

/// Run `apply` as a conditional load → apply → replace transaction.
///
/// `apply` may run several times when concurrent writers keep moving the
/// revision, so it must derive its result from the roster it is given.
pub async fn transact<T, F>(state: &SharedState, mut apply: F) -> Result<Committed<T>, ServiceError>
where
    F: FnMut(&Roster) -> Result<Mutation<T>, ServiceError>,
{
    let store = state.require_roster_store().await?;
    let max_retries = state.config().max_conflict_retries();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let (revision, current, loaded_at) = match store.load().await? {
            Some(stored) => {
                let loaded_at = stored.roster.updated_at;
                (Some(stored.revision), Roster::from(stored.roster), Some(loaded_at))
            }
            None => (None, Roster::default(), None),
        };

        let (next, value) = match apply(&current)? {
            Mutation::Skip(value) => {
                debug!(attempt, "transaction left the roster untouched");
                return Ok(Committed {
                    value,
                    roster: current,
                    written: false,
                    updated_at: loaded_at,
                });
            }
            Mutation::Write(next, value) => (next, value),
        };

        let written_at = SystemTime::now();
        let entity = next.clone().into_entity(written_at);
        match store.replace_if(entity, revision).await {
            Ok(revision) => {
                debug!(attempt, %revision, players = next.len(), "roster committed");
                return Ok(Committed {
                    value,
                    roster: next,
                    written: true,
                    updated_at: Some(written_at),
                });
            }
            Err(err) if err.is_conflict() && attempt <= max_retries => {
                warn!(attempt, "roster changed concurrently; retrying transaction");
            }
            Err(err) if err.is_conflict() => {
                warn!(attempt, "giving up on roster transaction after repeated conflicts");
                return Err(ServiceError::Conflict(format!(
                    "roster kept changing after {attempt} attempt(s)"
                )));
            }
            Err(err) => return Err(err.into()),
        }
    }
}
