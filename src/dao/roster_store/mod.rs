#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{Revision, RosterEntity, StoredRoster};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer holding the single roster document.
///
/// Every write replaces the whole document. `replace_if` is the conditional
/// variant used by transactions: it only succeeds when the stored revision still
/// matches `expected` (`None` meaning the document must not exist yet) and
/// fails with [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
/// otherwise.
pub trait RosterStore: Send + Sync {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<StoredRoster>>>;
    fn replace(&self, roster: RosterEntity) -> BoxFuture<'static, StorageResult<Revision>>;
    fn replace_if(
        &self,
        roster: RosterEntity,
        expected: Option<Revision>,
    ) -> BoxFuture<'static, StorageResult<Revision>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
