use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::scoreboard::ScoreboardResponse, services::scoreboard_service, state::SharedState};

/// Read-only leaderboard routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/scoreboard", get(scoreboard))
}

/// Ranked leaderboard with per-game leaders.
#[utoipa::path(
    get,
    path = "/scoreboard",
    tag = "scoreboard",
    responses((status = 200, description = "Ranked scoreboard or empty placeholder", body = ScoreboardResponse))
)]
pub async fn scoreboard(State(state): State<SharedState>) -> Json<ScoreboardResponse> {
    Json(scoreboard_service::get_ranked_scoreboard(&state).await)
}
