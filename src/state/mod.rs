pub mod roster;
pub mod scoreboard;
mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::roster_store::RosterStore, error::ServiceError};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and broadcast channels.
pub struct AppState {
    roster_store: RwLock<Option<Arc<dyn RosterStore>>>,
    sse: SseHub,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Self::build(config, None)
    }

    /// Construct a state that is immediately backed by `store`.
    pub fn with_store(config: AppConfig, store: Arc<dyn RosterStore>) -> SharedState {
        Self::build(config, Some(store))
    }

    fn build(config: AppConfig, store: Option<Arc<dyn RosterStore>>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(store.is_none());
        Arc::new(Self {
            roster_store: RwLock::new(store),
            sse: SseHub::new(config.sse_capacity()),
            degraded: degraded_tx,
            config,
        })
    }

    /// Obtain a handle to the current roster store, if one is installed.
    pub async fn roster_store(&self) -> Option<Arc<dyn RosterStore>> {
        let guard = self.roster_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current roster store or fail with [`ServiceError::Degraded`].
    pub async fn require_roster_store(&self) -> Result<Arc<dyn RosterStore>, ServiceError> {
        self.roster_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new roster store implementation and leave degraded mode.
    pub async fn set_roster_store(&self, store: Arc<dyn RosterStore>) -> bool {
        {
            let mut guard = self.roster_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false)
    }

    /// Remove the current roster store and enter degraded mode.
    pub async fn clear_roster_store(&self) -> bool {
        {
            let mut guard = self.roster_store.write().await;
            guard.take();
        }
        self.update_degraded(true)
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update the degraded flag, returning whether it changed.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::roster_store::memory::MemoryRosterStore;

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_roster_store().await,
            Err(ServiceError::Degraded)
        ));

        let mut watcher = state.degraded_watcher();
        assert!(
            state
                .set_roster_store(Arc::new(MemoryRosterStore::new()))
                .await
        );
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_roster_store().await.is_ok());

        assert!(state.clear_roster_store().await);
        assert!(state.is_degraded());
    }

    #[test]
    fn update_degraded_reports_changes_only() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryRosterStore::new()));
        assert!(!state.update_degraded(false));
        assert!(state.update_degraded(true));
        assert!(!state.update_degraded(true));
    }
}
