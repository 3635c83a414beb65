//! Process-local [`RosterStore`] used by tests, demos and the `memory` backend.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dao::{
    models::{Revision, RosterEntity, StoredRoster},
    roster_store::RosterStore,
    storage::{StorageError, StorageResult},
};

/// Failures the in-memory backend can be told to simulate.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("in-memory roster store is offline")]
    Offline,
}

impl From<MemoryStoreError> for StorageError {
    fn from(err: MemoryStoreError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Roster store kept in process memory.
#[derive(Clone, Default)]
pub struct MemoryRosterStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    document: RwLock<Option<StoredRoster>>,
    offline: AtomicBool,
    writes: AtomicUsize,
    pending_interference: AtomicUsize,
}

impl MemoryRosterStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that already holds `roster`.
    pub fn with_roster(roster: RosterEntity) -> Self {
        let inner = MemoryInner {
            document: RwLock::new(Some(StoredRoster {
                revision: Revision::generate(),
                roster,
            })),
            ..MemoryInner::default()
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Toggle simulated backend outages for every operation.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes issued against this store.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Make the next `count` conditional writes race with a concurrent writer that
    /// re-saves the current document under a new revision just before them.
    pub fn interfere_with_next_writes(&self, count: usize) {
        self.inner
            .pending_interference
            .store(count, Ordering::SeqCst);
    }

    /// Current document without going through the trait, for assertions.
    pub async fn snapshot(&self) -> Option<StoredRoster> {
        self.inner.document.read().await.clone()
    }

    fn ensure_online(&self) -> Result<(), MemoryStoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            Err(MemoryStoreError::Offline)
        } else {
            Ok(())
        }
    }

    fn take_interference(&self) -> bool {
        self.inner
            .pending_interference
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn load(&self) -> StorageResult<Option<StoredRoster>> {
        self.ensure_online()?;
        Ok(self.inner.document.read().await.clone())
    }

    async fn replace(&self, roster: RosterEntity) -> StorageResult<Revision> {
        self.ensure_online()?;
        let revision = Revision::generate();
        let mut guard = self.inner.document.write().await;
        *guard = Some(StoredRoster {
            revision: revision.clone(),
            roster,
        });
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(revision)
    }

    async fn replace_if(
        &self,
        roster: RosterEntity,
        expected: Option<Revision>,
    ) -> StorageResult<Revision> {
        self.ensure_online()?;
        let mut guard = self.inner.document.write().await;

        if self.take_interference() {
            let current = guard.as_ref().map(|stored| stored.roster.clone());
            *guard = Some(StoredRoster {
                revision: Revision::generate(),
                roster: current.unwrap_or_else(|| RosterEntity {
                    players: Vec::new(),
                    updated_at: roster.updated_at,
                }),
            });
        }

        let current = guard.as_ref().map(|stored| &stored.revision);
        if current != expected.as_ref() {
            return Err(StorageError::conflict(
                expected.as_ref().map(Revision::as_str),
            ));
        }

        let revision = Revision::generate();
        *guard = Some(StoredRoster {
            revision: revision.clone(),
            roster,
        });
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(revision)
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<StoredRoster>>> {
        let store = self.clone();
        Box::pin(async move { store.load().await })
    }

    fn replace(&self, roster: RosterEntity) -> BoxFuture<'static, StorageResult<Revision>> {
        let store = self.clone();
        Box::pin(async move { store.replace(roster).await })
    }

    fn replace_if(
        &self,
        roster: RosterEntity,
        expected: Option<Revision>,
    ) -> BoxFuture<'static, StorageResult<Revision>> {
        let store = self.clone();
        Box::pin(async move { store.replace_if(roster, expected).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online().map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online().map_err(Into::into) })
    }
}
