use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use tolk_types::{ScopeGranularity, ScopeKey, TranslationSource};

use crate::error::Result;
use crate::mapper::{AnonymizationMapper, DisplayMapping};
use crate::tracker::VoteSessionTracker;

/// Everything one viewing session knows: its pseudonym mappings and its votes.
///
/// Created when the session starts and dropped when it ends. Never shared
/// between sessions and never persisted.
#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    granularity: ScopeGranularity,
    mapper: AnonymizationMapper,
    tracker: VoteSessionTracker,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(granularity: ScopeGranularity) -> Self {
        Self::with_mapper(granularity, AnonymizationMapper::new())
    }

    pub fn with_mapper(granularity: ScopeGranularity, mapper: AnonymizationMapper) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            granularity,
            mapper,
            tracker: VoteSessionTracker::new(),
            created_at: now,
            last_seen: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn granularity(&self) -> ScopeGranularity {
        self.granularity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }

    pub fn mapper(&self) -> &AnonymizationMapper {
        &self.mapper
    }

    pub fn tracker(&self) -> &VoteSessionTracker {
        &self.tracker
    }

    /// Scope used for a post's translation columns.
    pub fn post_scope(&self, thread_id: &str, post_id: &str) -> ScopeKey {
        self.granularity.key_for(thread_id, post_id)
    }

    pub fn assign<I, S>(&mut self, scope: ScopeKey, sources: I) -> Result<&DisplayMapping>
    where
        I: IntoIterator<Item = S>,
        S: Into<TranslationSource>,
    {
        self.mapper.assign(scope, sources)
    }

    /// Display name for a post column, revealed only if this session voted for that source there.
    pub fn display_name(&self, thread_id: &str, post_id: &str, source: &str) -> Result<String> {
        let reveal = self.tracker.has_voted(thread_id, post_id, source);
        self.mapper
            .resolve_display_name(&self.post_scope(thread_id, post_id), source, reveal)
    }

    pub fn source_for(&self, thread_id: &str, post_id: &str, display_name: &str) -> Result<TranslationSource> {
        self.mapper
            .resolve_source(&self.post_scope(thread_id, post_id), display_name)
    }

    /// Reveal-after-vote: an item's distribution is shown only once this session voted on it.
    pub fn can_see_results(&self, thread_id: &str, post_id: &str) -> bool {
        self.tracker.has_voted_on(thread_id, post_id)
    }

    pub fn has_voted(&self, thread_id: &str, post_id: &str, source: &str) -> bool {
        self.tracker.has_voted(thread_id, post_id, source)
    }

    pub fn has_voted_on(&self, thread_id: &str, post_id: &str) -> bool {
        self.tracker.has_voted_on(thread_id, post_id)
    }

    pub fn record_vote(&mut self, thread_id: &str, post_id: &str, source: &str) -> bool {
        self.tracker.record(thread_id, post_id, source)
    }

    pub fn clear_vote(&mut self, thread_id: &str, post_id: &str, source: &str) -> bool {
        self.tracker.clear(thread_id, post_id, source)
    }
}
