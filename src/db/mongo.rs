//! MongoDB client and the production war store
//!
//! Connection handling follows the shared pattern: server-selection
//! timeout injected into the URI so an unreachable MongoDB fails fast,
//! connection verified with a ping before anything runs.

use bson::{doc, oid::ObjectId};
use futures_util::StreamExt;
use mongodb::{Client, Collection};
use tracing::{error, info};

use crate::db::schemas::{ClanDoc, RawWarDoc, CLAN_COLLECTION, WAR_HISTORY_COLLECTION};
use crate::reconcile::store::WarStore;
use crate::types::{Result, SweepError};

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| SweepError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        // Verify connection with timeout
        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| SweepError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.db_name).collection::<T>(name)
    }
}

/// Production `WarStore` over the `clans` and `war_history` collections
#[derive(Clone)]
pub struct MongoWarStore {
    client: MongoClient,
}

impl MongoWarStore {
    pub fn new(client: MongoClient) -> Self {
        Self { client }
    }

    async fn drain<T>(
        mut cursor: mongodb::Cursor<T>,
    ) -> std::result::Result<Vec<T>, mongodb::error::Error>
    where
        T: serde::de::DeserializeOwned + Send + Sync,
    {
        let mut results = Vec::new();
        while let Some(item) = cursor.next().await {
            match item {
                Ok(doc) => results.push(doc),
                Err(e) => {
                    error!("Error reading document: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(results)
    }
}

#[async_trait::async_trait]
impl WarStore for MongoWarStore {
    async fn list_clans(&self) -> Result<Vec<ClanDoc>> {
        let cursor = self
            .client
            .collection::<ClanDoc>(CLAN_COLLECTION)
            .find(doc! {})
            .await
            .map_err(|e| SweepError::Database(format!("Clan registry read failed: {}", e)))?;

        Self::drain(cursor)
            .await
            .map_err(|e| SweepError::Database(format!("Clan registry read failed: {}", e)))
    }

    async fn list_war_history(&self, clan_tag: &str) -> Result<Vec<RawWarDoc>> {
        let cursor = self
            .client
            .collection::<RawWarDoc>(WAR_HISTORY_COLLECTION)
            .find(doc! { "clan_id": clan_tag })
            .await
            .map_err(|e| SweepError::fetch(clan_tag, e))?;

        Self::drain(cursor)
            .await
            .map_err(|e| SweepError::fetch(clan_tag, e))
    }

    async fn delete_war_records(&self, clan_tag: &str, ids: &[ObjectId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        // One delete_many command is the batch commit for the clan. The
        // clan_id filter keeps the delete scoped even if an id from
        // another clan ever slipped into the list.
        let result = self
            .client
            .collection::<RawWarDoc>(WAR_HISTORY_COLLECTION)
            .delete_many(doc! {
                "clan_id": clan_tag,
                "_id": { "$in": ids.to_vec() },
            })
            .await
            .map_err(|e| SweepError::deletion(clan_tag, e))?;

        Ok(result.deleted_count)
    }
}
