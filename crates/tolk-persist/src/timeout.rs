use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use tolk_types::{VoteRecord, VoteTally};

use crate::error::{PersistError, Result};
use crate::store::VoteStore;

/// Bounds every call on the inner store; expiry surfaces as `StorageUnavailable`.
pub struct TimeoutVoteStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: VoteStore> TimeoutVoteStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Vote storage call timed out"
                );
                Err(PersistError::StorageUnavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<S: VoteStore> VoteStore for TimeoutVoteStore<S> {
    async fn cast(
        &self,
        thread_id: &str,
        post_id: &str,
        source: &str,
        voter_identity: &str,
    ) -> Result<VoteRecord> {
        self.bounded("cast", self.inner.cast(thread_id, post_id, source, voter_identity))
            .await
    }

    async fn revoke(&self, thread_id: &str, post_id: &str, voter_identity: &str) -> Result<u64> {
        self.bounded("revoke", self.inner.revoke(thread_id, post_id, voter_identity))
            .await
    }

    async fn revoke_source(
        &self,
        thread_id: &str,
        post_id: &str,
        voter_identity: &str,
        source: &str,
    ) -> Result<u64> {
        self.bounded(
            "revoke_source",
            self.inner.revoke_source(thread_id, post_id, voter_identity, source),
        )
        .await
    }

    async fn stats_for(&self, thread_id: &str, post_id: &str) -> Result<VoteTally> {
        self.bounded("stats_for", self.inner.stats_for(thread_id, post_id))
            .await
    }

    async fn stats_global(&self) -> Result<VoteTally> {
        self.bounded("stats_global", self.inner.stats_global()).await
    }

    async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryVoteStore;

    /// Never answers within any reasonable timeout.
    struct StalledStore;

    #[async_trait]
    impl VoteStore for StalledStore {
        async fn cast(&self, _: &str, _: &str, _: &str, _: &str) -> Result<VoteRecord> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(PersistError::Internal("unreachable".to_string()))
        }

        async fn revoke(&self, _: &str, _: &str, _: &str) -> Result<u64> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(0)
        }

        async fn revoke_source(&self, _: &str, _: &str, _: &str, _: &str) -> Result<u64> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(0)
        }

        async fn stats_for(&self, _: &str, _: &str) -> Result<VoteTally> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(VoteTally::default())
        }

        async fn stats_global(&self) -> Result<VoteTally> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(VoteTally::default())
        }

        async fn ping(&self) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_expiry_is_storage_unavailable() {
        let store = TimeoutVoteStore::new(StalledStore, Duration::from_millis(20));

        let err = store.cast("42", "7", "gpt-4o", "203.0.113.5").await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(store.stats_for("42", "7").await.unwrap_err().is_unavailable());
        assert!(store.ping().await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn test_fast_store_passes_through() {
        let store = TimeoutVoteStore::new(MemoryVoteStore::new(), Duration::from_secs(1));

        store.cast("42", "7", "gpt-4o", "203.0.113.5").await.unwrap();
        let tally = store.stats_for("42", "7").await.unwrap();
        assert_eq!(tally.count("gpt-4o"), 1);
        assert_eq!(store.inner().len().await, 1);
    }
}
