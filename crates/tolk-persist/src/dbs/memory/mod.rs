use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use tolk_types::{VoteRecord, VoteTally};

use crate::error::Result;
use crate::store::VoteStore;

/// Process-local vote log. Used in tests and for `storage.backend = "memory"`.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    votes: RwLock<Vec<VoteRecord>>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.votes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.votes.read().await.is_empty()
    }

    pub async fn records(&self) -> Vec<VoteRecord> {
        self.votes.read().await.clone()
    }

    async fn delete_where<F>(&self, predicate: F) -> u64
    where
        F: Fn(&VoteRecord) -> bool + Send,
    {
        let mut votes = self.votes.write().await;
        let before = votes.len();
        votes.retain(|v| !predicate(v));
        (before - votes.len()) as u64
    }

    async fn tally_where<F>(&self, predicate: F) -> VoteTally
    where
        F: Fn(&VoteRecord) -> bool + Send,
    {
        let votes = self.votes.read().await;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for vote in votes.iter().filter(|v| predicate(v)) {
            *counts.entry(vote.source.clone()).or_default() += 1;
        }
        VoteTally::from_counts(counts)
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn cast(
        &self,
        thread_id: &str,
        post_id: &str,
        source: &str,
        voter_identity: &str,
    ) -> Result<VoteRecord> {
        let vote = VoteRecord::new(thread_id, post_id, source, voter_identity);
        self.votes.write().await.push(vote.clone());
        tracing::debug!(thread_id, post_id, source, "Vote stored");
        Ok(vote)
    }

    async fn revoke(&self, thread_id: &str, post_id: &str, voter_identity: &str) -> Result<u64> {
        Ok(self
            .delete_where(|v| v.matches(thread_id, post_id, voter_identity))
            .await)
    }

    async fn revoke_source(
        &self,
        thread_id: &str,
        post_id: &str,
        voter_identity: &str,
        source: &str,
    ) -> Result<u64> {
        Ok(self
            .delete_where(|v| v.matches(thread_id, post_id, voter_identity) && v.source == source)
            .await)
    }

    async fn stats_for(&self, thread_id: &str, post_id: &str) -> Result<VoteTally> {
        Ok(self
            .tally_where(|v| v.thread_id == thread_id && v.post_id == post_id)
            .await)
    }

    async fn stats_global(&self) -> Result<VoteTally> {
        Ok(self.tally_where(|_| true).await)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const VOTER: &str = "203.0.113.5";

    #[tokio::test]
    async fn test_stats_for_empty_item() {
        let store = MemoryVoteStore::new();
        let tally = store.stats_for("42", "7").await.unwrap();
        assert!(tally.counts.is_empty());
        assert_eq!(tally.total, 0);
    }

    #[tokio::test]
    async fn test_cast_then_stats() {
        let store = MemoryVoteStore::new();
        let vote = store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        assert_eq!(vote.source, "gpt-4o");
        assert_eq!(vote.voter_identity, VOTER);

        let tally = store.stats_for("42", "7").await.unwrap();
        assert_eq!(tally.counts, BTreeMap::from([("gpt-4o".to_string(), 1)]));
        assert_eq!(tally.total, 1);
    }

    #[tokio::test]
    async fn test_cast_increments_by_exactly_one() {
        let store = MemoryVoteStore::new();
        store.cast("42", "7", "claude", "198.51.100.1").await.unwrap();
        store.cast("42", "7", "gpt-4o", "198.51.100.2").await.unwrap();
        let before = store.stats_for("42", "7").await.unwrap();

        store.cast("42", "7", "claude", VOTER).await.unwrap();
        let after = store.stats_for("42", "7").await.unwrap();

        assert_eq!(after.count("claude"), before.count("claude") + 1);
        assert_eq!(after.count("gpt-4o"), before.count("gpt-4o"));
        assert_eq!(after.total, before.total + 1);
    }

    #[tokio::test]
    async fn test_store_accepts_duplicates() {
        let store = MemoryVoteStore::new();
        store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        assert_eq!(store.stats_for("42", "7").await.unwrap().count("gpt-4o"), 2);
    }

    #[tokio::test]
    async fn test_revoke_restores_previous_counts() {
        let store = MemoryVoteStore::new();
        store.cast("42", "7", "claude", "198.51.100.1").await.unwrap();
        let before = store.stats_for("42", "7").await.unwrap();

        store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        store.cast("42", "7", "gemini", VOTER).await.unwrap();
        assert_eq!(store.revoke("42", "7", VOTER).await.unwrap(), 2);

        assert_eq!(store.stats_for("42", "7").await.unwrap(), before);
        assert_eq!(store.revoke("42", "7", VOTER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke_source_leaves_other_sources() {
        let store = MemoryVoteStore::new();
        store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        store.cast("42", "7", "gemini", VOTER).await.unwrap();
        store.cast("42", "8", "gpt-4o", VOTER).await.unwrap();

        assert_eq!(store.revoke_source("42", "7", VOTER, "gpt-4o").await.unwrap(), 1);

        let tally = store.stats_for("42", "7").await.unwrap();
        assert_eq!(tally.count("gpt-4o"), 0);
        assert_eq!(tally.count("gemini"), 1);
        assert_eq!(store.stats_for("42", "8").await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_global_stats_span_items() {
        let store = MemoryVoteStore::new();
        store.cast("42", "7", "gpt-4o", VOTER).await.unwrap();
        store.cast("42", "8", "gpt-4o", VOTER).await.unwrap();
        store.cast("43", "1", "deepseek", VOTER).await.unwrap();

        let global = store.stats_global().await.unwrap();
        assert_eq!(global.count("gpt-4o"), 2);
        assert_eq!(global.count("deepseek"), 1);
        assert_eq!(global.total, 3);
    }

    #[tokio::test]
    async fn test_concurrent_voters() {
        let store = Arc::new(MemoryVoteStore::new());
        let mut handles = Vec::new();
        for n in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let voter = format!("198.51.100.{}", n);
                store.cast("42", "7", "gpt-4o", &voter).await.unwrap();
                if n % 2 == 0 {
                    store.revoke("42", "7", &voter).await.unwrap();
                }
                store.stats_for("42", "7").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.stats_for("42", "7").await.unwrap().total, 16);
    }
}
