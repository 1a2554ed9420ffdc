use std::sync::Arc;
use std::time::Duration;

use crate::dbs::mongo::{MongoSettings, MongoVoteStore};
use crate::error::{PersistError, Result};
use crate::store::VoteStore;
use crate::timeout::TimeoutVoteStore;

pub struct VoteStoreBuilder {
    mongodb_uri: Option<String>,
    database: Option<String>,
    collection: String,
    pool_size: u32,
    timeout: Duration,
}

impl VoteStoreBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
            collection: "votes".to_string(),
            pool_size: 10,
            timeout: Duration::from_secs(3),
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }

    /// Upper bound on every storage call, including connection setup.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn build(self) -> Result<Arc<dyn VoteStore>> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let settings = MongoSettings {
            database,
            collection: self.collection,
            pool_size: self.pool_size,
            timeout: self.timeout,
        };
        let store = MongoVoteStore::connect(&mongodb_uri, &settings).await?;
        Ok(Arc::new(TimeoutVoteStore::new(store, self.timeout)))
    }
}

impl Default for VoteStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_uri_is_rejected() {
        let err = VoteStoreBuilder::new().database("tolk").build().await.err().unwrap();
        assert!(matches!(err, PersistError::Internal(msg) if msg.contains("mongodb_uri")));
    }

    #[tokio::test]
    async fn test_missing_database_is_rejected() {
        let err = VoteStoreBuilder::new()
            .mongodb_uri("mongodb://localhost:27017")
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PersistError::Internal(msg) if msg.contains("database")));
    }
}
