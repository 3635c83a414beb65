/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Load and conditional replace of the persisted roster.
pub mod roster_service;
/// Operations behind the editing form and the leaderboard.
pub mod scoreboard_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Roster store connection supervisor toggling degraded mode.
pub mod storage_supervisor;
