use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the minigame scoreboard.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::roster::editing_rows,
        crate::routes::roster::save_edits,
        crate::routes::roster::reset_roster,
        crate::routes::roster::add_player,
        crate::routes::roster::remove_last_player,
        crate::routes::roster::remove_player_by_id,
        crate::routes::scoreboard::scoreboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::sse::SystemStatus,
            crate::dto::roster::EditingRosterResponse,
            crate::dto::roster::EditableRowDto,
            crate::dto::roster::SaveEditsRequest,
            crate::dto::roster::RawRowInput,
            crate::dto::roster::RawScore,
            crate::dto::roster::SaveEditsResponse,
            crate::dto::roster::PlayerSummary,
            crate::dto::roster::AddPlayerResponse,
            crate::dto::roster::RemovePlayerResponse,
            crate::dto::roster::RemoveOutcome,
            crate::dto::roster::ResetRosterResponse,
            crate::dto::scoreboard::ScoreboardResponse,
            crate::dto::scoreboard::RankedEntryDto,
            crate::dto::scoreboard::GameLeaderDto,
            crate::state::roster::Game,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "roster", description = "Roster editing operations"),
        (name = "scoreboard", description = "Ranked leaderboard"),
    )
)]
pub struct ApiDoc;
