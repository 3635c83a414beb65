use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{roster_store::RosterStore, storage::StorageError},
    services::sse_events,
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Keep a roster store installed in the shared state, flipping degraded mode
/// whenever the backend stops answering.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn RosterStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                if state.set_roster_store(store.clone()).await {
                    sse_events::broadcast_system_status(&state, false);
                }
                info!("roster store connected; leaving degraded mode");
                delay = INITIAL_DELAY;

                watch_store(&state, store.as_ref()).await;

                if state.clear_roster_store().await {
                    sse_events::broadcast_system_status(&state, true);
                }
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "roster store connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Poll `store` until it fails and cannot be revived in place.
async fn watch_store(state: &SharedState, store: &dyn RosterStore) {
    loop {
        if store.health_check().await.is_ok() {
            set_degraded(state, false);
            sleep(HEALTH_POLL_INTERVAL).await;
            continue;
        }

        if !reconnect(state, store).await {
            warn!("exhausted roster store reconnect attempts; staying in degraded mode");
            return;
        }

        set_degraded(state, false);
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

async fn reconnect(state: &SharedState, store: &dyn RosterStore) -> bool {
    let mut reconnect_delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "roster store reconnected after failed health check");
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(attempt, error = %err, "roster store reconnect failed; entering degraded mode");
                    set_degraded(state, true);
                } else {
                    warn!(attempt, error = %err, "roster store reconnect attempt failed");
                }
                sleep(reconnect_delay).await;
                reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}

fn set_degraded(state: &SharedState, degraded: bool) {
    if state.update_degraded(degraded) {
        if degraded {
            warn!("entering degraded mode");
        } else {
            info!("roster store healthy again; leaving degraded mode");
        }
        sse_events::broadcast_system_status(state, degraded);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::roster_store::memory::MemoryRosterStore,
        state::AppState,
    };

    #[tokio::test(start_paused = true)]
    async fn installs_store_after_failed_attempts() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = attempts.clone();
        let handle = tokio::spawn(run(state.clone(), move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StorageError::unavailable(
                        "not yet".into(),
                        std::io::Error::other("refused"),
                    ))
                } else {
                    Ok(Arc::new(MemoryRosterStore::new()) as Arc<dyn RosterStore>)
                }
            }
        }));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event, "system.status");
        assert_eq!(event.data, r#"{"degraded":false}"#);
        assert!(!state.is_degraded());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn offline_store_flips_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryRosterStore::new();
        let mut watcher = state.degraded_watcher();

        let supervised = store.clone();
        let handle = tokio::spawn(run(state.clone(), move || {
            let store = supervised.clone();
            async move { Ok(Arc::new(store) as Arc<dyn RosterStore>) }
        }));

        watcher.wait_for(|degraded| !*degraded).await.unwrap();
        store.set_offline(true);
        watcher.wait_for(|degraded| *degraded).await.unwrap();
        store.set_offline(false);
        watcher.wait_for(|degraded| !*degraded).await.unwrap();

        handle.abort();
    }
}
