use async_trait::async_trait;

use tolk_types::{VoteRecord, VoteTally};

use crate::error::Result;

/// Durable append/delete log of votes.
///
/// Implementations do not enforce one vote per voter: uniqueness is the
/// caller's job. Every method fails with `StorageUnavailable` when the
/// backing store cannot be reached.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Append a vote unconditionally.
    async fn cast(
        &self,
        thread_id: &str,
        post_id: &str,
        source: &str,
        voter_identity: &str,
    ) -> Result<VoteRecord>;

    /// Delete every vote by `voter_identity` on the item, whatever the source.
    /// Returns the number of deleted votes; zero is not an error.
    async fn revoke(&self, thread_id: &str, post_id: &str, voter_identity: &str) -> Result<u64>;

    /// Delete only the voter's votes for `source` on the item.
    async fn revoke_source(
        &self,
        thread_id: &str,
        post_id: &str,
        voter_identity: &str,
        source: &str,
    ) -> Result<u64>;

    /// Per-source counts for one item. Empty tally when nobody voted.
    async fn stats_for(&self, thread_id: &str, post_id: &str) -> Result<VoteTally>;

    /// Per-source counts across every item.
    async fn stats_global(&self) -> Result<VoteTally>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<()>;
}
