use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::Duration;

use tolk_types::{VoteRecord, VoteTally};

use crate::dbs::mongo::models::MongoVote;
use crate::dbs::mongo::repositories::MongoVoteRepository;
use crate::error::{PersistError, Result};
use crate::store::VoteStore;

/// Connection settings for [`MongoVoteStore::connect`].
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub database: String,
    pub collection: String,
    pub pool_size: u32,
    /// Applied to server selection and connection establishment.
    pub timeout: Duration,
}

pub struct MongoVoteStore {
    vote_repo: MongoVoteRepository,
}

impl MongoVoteStore {
    /// Connect to MongoDB and make sure the vote indexes exist
    ///
    /// An unreachable server is not fatal here: the driver connects lazily, and
    /// later calls report `StorageUnavailable` until it comes back.
    pub async fn connect(mongodb_uri: &str, settings: &MongoSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::StorageUnavailable(e.to_string()))?;
        options.app_name = Some("tolk".to_string());
        options.max_pool_size = Some(settings.pool_size);
        options.server_selection_timeout = Some(settings.timeout);
        options.connect_timeout = Some(settings.timeout);

        let client = Client::with_options(options)
            .map_err(|e| PersistError::StorageUnavailable(e.to_string()))?;

        let vote_repo = MongoVoteRepository::new(&client, &settings.database, &settings.collection);
        match vote_repo.ensure_indexes().await {
            Ok(()) => tracing::info!(
                database = %settings.database,
                collection = %settings.collection,
                "Vote store connected"
            ),
            Err(e) if e.is_unavailable() => tracing::warn!(
                database = %settings.database,
                "Vote store unreachable, voting stays disabled until it answers: {}",
                e
            ),
            Err(e) => return Err(e),
        }

        Ok(Self { vote_repo })
    }
}

#[async_trait]
impl VoteStore for MongoVoteStore {
    async fn cast(
        &self,
        thread_id: &str,
        post_id: &str,
        source: &str,
        voter_identity: &str,
    ) -> Result<VoteRecord> {
        let vote = VoteRecord::new(thread_id, post_id, source, voter_identity);
        let document: MongoVote = vote.clone().into();
        let id = self.vote_repo.insert(&document).await?;
        tracing::debug!(vote_id = %id, thread_id, post_id, source, "Vote stored");
        Ok(vote)
    }

    async fn revoke(&self, thread_id: &str, post_id: &str, voter_identity: &str) -> Result<u64> {
        let mut filter = MongoVoteRepository::item_filter(thread_id, post_id);
        filter.insert("user_ip", voter_identity);
        self.vote_repo.delete_matching(filter).await
    }

    async fn revoke_source(
        &self,
        thread_id: &str,
        post_id: &str,
        voter_identity: &str,
        source: &str,
    ) -> Result<u64> {
        let mut filter = MongoVoteRepository::item_filter(thread_id, post_id);
        filter.insert("user_ip", voter_identity);
        filter.insert("model", source);
        self.vote_repo.delete_matching(filter).await
    }

    async fn stats_for(&self, thread_id: &str, post_id: &str) -> Result<VoteTally> {
        let filter = MongoVoteRepository::item_filter(thread_id, post_id);
        let counts = self.vote_repo.count_by_model(Some(filter)).await?;
        Ok(VoteTally::from_counts(counts))
    }

    async fn stats_global(&self) -> Result<VoteTally> {
        let counts = self.vote_repo.count_by_model(None).await?;
        Ok(VoteTally::from_counts(counts))
    }

    async fn ping(&self) -> Result<()> {
        self.vote_repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_revoke_filters() {
        let mut filter = MongoVoteRepository::item_filter("42", "7");
        filter.insert("user_ip", "203.0.113.5");
        assert_eq!(
            filter,
            doc! { "thread_id": "42", "post_id": "7", "user_ip": "203.0.113.5" }
        );
    }
}
