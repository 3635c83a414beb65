use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::dao::{
    models::{Revision, RosterEntity, StoredRoster},
    roster_store::RosterStore,
    storage::{StorageError, StorageResult},
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{CouchRosterDocument, PutResponse, ROSTER_DOC_ID},
};

/// Attempts an unconditional replace makes when another writer keeps moving `_rev`.
const BLIND_WRITE_ATTEMPTS: u32 = 3;

enum PutOutcome {
    Written(Revision),
    Conflict,
}

#[derive(Clone)]
pub struct CouchRosterStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchRosterStore {
    /// Build the HTTP client and make sure the roster database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            database: Arc::from(config.database),
            auth: config
                .credentials
                .map(|(user, pass)| (Arc::from(user), Arc::from(pass))),
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn database_request(&self, method: Method) -> RequestBuilder {
        self.authorize(self.client.request(method, self.database_url()))
    }

    fn document_request(&self, method: Method, doc_id: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.database_url(), doc_id);
        self.authorize(self.client.request(method, url))
    }

    /// Create the database on first use. A concurrent creator winning the race
    /// answers 412, which counts as success.
    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.as_ref();
        let status = self
            .database_request(Method::GET)
            .send()
            .await
            .map_err(CouchDaoError::transport(database))?
            .status();

        if status.is_success() {
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            return Err(CouchDaoError::status(database, status));
        }

        let created = self
            .database_request(Method::PUT)
            .send()
            .await
            .map_err(CouchDaoError::transport(database))?
            .status();

        match created {
            status if status.is_success() => {
                info!(database, "created CouchDB roster database");
                Ok(())
            }
            StatusCode::PRECONDITION_FAILED => Ok(()),
            status => Err(CouchDaoError::status(database, status)),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .document_request(Method::GET, doc_id)
            .send()
            .await
            .map_err(CouchDaoError::transport(doc_id))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map(Some)
                .map_err(CouchDaoError::decode(doc_id)),
            status => Err(CouchDaoError::status(doc_id, status)),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<PutOutcome>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .document_request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(CouchDaoError::transport(doc_id))?;

        match response.status() {
            StatusCode::CONFLICT => Ok(PutOutcome::Conflict),
            status if status.is_success() => {
                let ack = response
                    .json::<PutResponse>()
                    .await
                    .map_err(CouchDaoError::decode(doc_id))?;
                Ok(PutOutcome::Written(Revision::new(ack.rev)))
            }
            status => Err(CouchDaoError::status(doc_id, status)),
        }
    }

    async fn load(&self) -> CouchResult<Option<StoredRoster>> {
        let document = self
            .get_document::<CouchRosterDocument>(ROSTER_DOC_ID)
            .await?;
        Ok(document.map(CouchRosterDocument::into_stored))
    }

    async fn replace(&self, roster: RosterEntity) -> StorageResult<Revision> {
        for attempt in 1..=BLIND_WRITE_ATTEMPTS {
            let current = self
                .get_document::<CouchRosterDocument>(ROSTER_DOC_ID)
                .await?
                .and_then(|existing| existing.rev)
                .map(Revision::new);
            let document = CouchRosterDocument::from((roster.clone(), current));

            match self.put_document(ROSTER_DOC_ID, &document).await? {
                PutOutcome::Written(revision) => return Ok(revision),
                PutOutcome::Conflict => {
                    debug!(attempt, "CouchDB revision moved during overwrite; refetching");
                }
            }
        }

        Err(StorageError::conflict(None))
    }

    async fn replace_if(
        &self,
        roster: RosterEntity,
        expected: Option<Revision>,
    ) -> StorageResult<Revision> {
        let document = CouchRosterDocument::from((roster, expected.clone()));
        match self.put_document(ROSTER_DOC_ID, &document).await? {
            PutOutcome::Written(revision) => Ok(revision),
            PutOutcome::Conflict => Err(StorageError::conflict(
                expected.as_ref().map(Revision::as_str),
            )),
        }
    }

    async fn health_check(&self) -> CouchResult<()> {
        let database = self.database.as_ref();
        let status = self
            .database_request(Method::HEAD)
            .send()
            .await
            .map_err(CouchDaoError::transport(database))?
            .status();

        if status.is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::status(database, status))
        }
    }
}

impl RosterStore for CouchRosterStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<StoredRoster>>> {
        let store = self.clone();
        Box::pin(async move { store.load().await.map_err(Into::into) })
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
        Box::pin(async move { store.health_check().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
