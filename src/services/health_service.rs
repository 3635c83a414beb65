use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report degraded mode, logging any roster store connectivity issue on the way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_roster_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "roster store health check failed");
            }
        }
        Err(_) => warn!("roster store unavailable (degraded mode)"),
    }

    HealthResponse::from_degraded(state.is_degraded())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::roster_store::memory::MemoryRosterStore, dto::health::HealthStatus,
        state::AppState,
    };

    #[tokio::test]
    async fn reflects_degraded_flag() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);

        state
            .set_roster_store(Arc::new(MemoryRosterStore::new()))
            .await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Ok);
    }
}
