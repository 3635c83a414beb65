use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        scoreboard::ScoreboardResponse,
        sse::{ServerEvent, SystemStatus},
    },
    state::{
        SharedState,
        roster::Roster,
        scoreboard,
    },
};

pub(crate) const EVENT_ROSTER_CHANGED: &str = "roster.changed";
pub(crate) const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the leaderboard computed from a freshly written roster, stamped
/// with the write time stored alongside it.
pub fn broadcast_roster_changed(
    state: &SharedState,
    roster: &Roster,
    updated_at: Option<SystemTime>,
) {
    let payload = ScoreboardResponse::build(
        scoreboard::rank(roster),
        scoreboard::leaders(roster),
        updated_at,
        true,
    );
    send_public_event(state, EVENT_ROSTER_CHANGED, &payload);
}

/// Broadcast that the backend entered or left degraded mode.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_public_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_public_event(state: &SharedState, event: &'static str, payload: &impl Serialize) {
    match ServerEvent::json(event, payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
