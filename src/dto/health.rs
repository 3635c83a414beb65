use serde::Serialize;
use utoipa::ToSchema;

/// Whether the roster store is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Storage reachable.
    Ok,
    /// Storage unreachable; writes are refused.
    Degraded,
}

/// Body of `/healthcheck`. The route answers 200 in both states.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current storage state.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Map the degraded flag to a response.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
