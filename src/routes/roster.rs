use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::roster::{
        AddPlayerResponse, EditingRosterResponse, RemovePlayerResponse, ResetRosterResponse,
        SaveEditsRequest, SaveEditsResponse,
    },
    error::AppError,
    services::scoreboard_service,
    state::SharedState,
};

/// Routes backing the roster editing form.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/roster", put(save_edits).delete(reset_roster))
        .route("/roster/editing", get(editing_rows))
        .route("/roster/players", post(add_player))
        .route("/roster/players/last", delete(remove_last_player))
        .route("/roster/players/{id}", delete(remove_player_by_id))
}

/// Rows for the editing form, padded with placeholders.
#[utoipa::path(
    get,
    path = "/roster/editing",
    tag = "roster",
    responses((status = 200, description = "Editable rows", body = EditingRosterResponse))
)]
pub async fn editing_rows(State(state): State<SharedState>) -> Json<EditingRosterResponse> {
    Json(scoreboard_service::load_roster_for_editing(&state).await)
}

/// Replace the roster with the submitted rows.
#[utoipa::path(
    put,
    path = "/roster",
    tag = "roster",
    request_body = SaveEditsRequest,
    responses(
        (status = 200, description = "Roster saved", body = SaveEditsResponse),
        (status = 400, description = "Too many rows submitted"),
        (status = 409, description = "Roster kept changing concurrently"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn save_edits(
    State(state): State<SharedState>,
    Json(payload): Json<SaveEditsRequest>,
) -> Result<Json<SaveEditsResponse>, AppError> {
    payload.validate()?;
    let response = scoreboard_service::save_edits(&state, payload.into_edits()).await?;
    Ok(Json(response))
}

/// Delete every player.
#[utoipa::path(
    delete,
    path = "/roster",
    tag = "roster",
    responses(
        (status = 200, description = "Roster cleared", body = ResetRosterResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn reset_roster(
    State(state): State<SharedState>,
) -> Result<Json<ResetRosterResponse>, AppError> {
    Ok(Json(scoreboard_service::reset_roster(&state).await?))
}

/// Append a zero-scored player.
#[utoipa::path(
    post,
    path = "/roster/players",
    tag = "roster",
    responses(
        (status = 200, description = "Player added", body = AddPlayerResponse),
        (status = 409, description = "Roster kept changing concurrently"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
) -> Result<Json<AddPlayerResponse>, AppError> {
    Ok(Json(scoreboard_service::add_player(&state).await?))
}

/// Remove the last player, if any.
#[utoipa::path(
    delete,
    path = "/roster/players/last",
    tag = "roster",
    responses(
        (status = 200, description = "Player removed, or nothing to remove", body = RemovePlayerResponse),
        (status = 409, description = "Roster kept changing concurrently"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn remove_last_player(
    State(state): State<SharedState>,
) -> Result<Json<RemovePlayerResponse>, AppError> {
    Ok(Json(scoreboard_service::remove_player(&state).await?))
}

/// Remove a specific player.
#[utoipa::path(
    delete,
    path = "/roster/players/{id}",
    tag = "roster",
    params(("id" = String, Path, description = "Identifier of the player to remove")),
    responses(
        (status = 200, description = "Player removed", body = RemovePlayerResponse),
        (status = 404, description = "No player with this identifier"),
        (status = 409, description = "Roster kept changing concurrently"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn remove_player_by_id(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RemovePlayerResponse>, AppError> {
    Ok(Json(
        scoreboard_service::remove_player_by_id(&state, id).await?,
    ))
}
