use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::{Client, Collection, Database, bson::doc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoRosterDocument, ROSTER_COLLECTION_NAME, is_duplicate_key, revision_filter,
        roster_filter,
    },
};
use crate::dao::{
    models::{Revision, RosterEntity, StoredRoster},
    roster_store::RosterStore,
    storage::{StorageError, StorageResult},
};

/// MongoDB-backed [`RosterStore`] keeping the roster in a single document.
#[derive(Clone)]
pub struct MongoRosterStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRosterStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoRosterDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoRosterDocument>(ROSTER_COLLECTION_NAME)
    }

    async fn load(&self) -> MongoResult<Option<StoredRoster>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(roster_filter())
            .await
            .map_err(|source| MongoDaoError::LoadRoster { source })?;

        Ok(document.map(Into::into))
    }

    async fn replace(&self, roster: RosterEntity) -> MongoResult<Revision> {
        let revision = Revision::generate();
        let document = MongoRosterDocument::new(roster, &revision);
        let collection = self.collection().await;

        collection
            .replace_one(roster_filter(), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRoster { source })?;

        Ok(revision)
    }

    async fn replace_if(
        &self,
        roster: RosterEntity,
        expected: Option<Revision>,
    ) -> StorageResult<Revision> {
        let revision = Revision::generate();
        let document = MongoRosterDocument::new(roster, &revision);
        let collection = self.collection().await;

        match expected {
            Some(expected) => {
                let result = collection
                    .replace_one(revision_filter(&expected), &document)
                    .await
                    .map_err(|source| MongoDaoError::SaveRoster { source })?;

                if result.matched_count == 0 {
                    debug!(expected = %expected, "roster revision moved on; rejecting write");
                    return Err(StorageError::conflict(Some(expected.as_str())));
                }
            }
            None => {
                // Creation races are settled by the unique `_id`.
                if let Err(source) = collection.insert_one(&document).await {
                    if is_duplicate_key(&source) {
                        return Err(StorageError::conflict(None));
                    }
                    return Err(MongoDaoError::SaveRoster { source }.into());
                }
            }
        }

        Ok(revision)
    }
}

impl RosterStore for MongoRosterStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<StoredRoster>>> {
        let store = self.clone();
        Box::pin(async move { store.load().await.map_err(Into::into) })
    }

    fn replace(&self, roster: RosterEntity) -> BoxFuture<'static, StorageResult<Revision>> {
        let store = self.clone();
        Box::pin(async move { store.replace(roster).await.map_err(Into::into) })
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
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
