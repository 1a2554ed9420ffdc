use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::TranslationSource;

/// One preference vote for a source's translation of a post.
///
/// `voter_identity` is whatever the client reported (usually an address);
/// it is not authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub thread_id: String,
    pub post_id: String,
    pub source: TranslationSource,
    pub voter_identity: String,
    pub timestamp: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(
        thread_id: impl Into<String>,
        post_id: impl Into<String>,
        source: impl Into<TranslationSource>,
        voter_identity: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            post_id: post_id.into(),
            source: source.into(),
            voter_identity: voter_identity.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn matches(&self, thread_id: &str, post_id: &str, voter_identity: &str) -> bool {
        self.thread_id == thread_id && self.post_id == post_id && self.voter_identity == voter_identity
    }
}

/// Raw per-source vote counts for one item, or for everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub counts: BTreeMap<TranslationSource, u64>,
    pub total: u64,
}

impl VoteTally {
    pub fn from_counts(counts: BTreeMap<TranslationSource, u64>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn count(&self, source: &str) -> u64 {
        self.counts.get(source).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
