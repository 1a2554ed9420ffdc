use std::collections::{BTreeSet, HashMap};

use tolk_types::TranslationSource;

/// In-memory record of what this viewing session has voted for.
///
/// This is a UI gate only; it does not make votes unique in the store.
#[derive(Debug, Clone, Default)]
pub struct VoteSessionTracker {
    votes: HashMap<(String, String), BTreeSet<TranslationSource>>,
}

impl VoteSessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, thread_id: &str, post_id: &str, source: &str) -> bool {
        self.votes
            .get(&key(thread_id, post_id))
            .is_some_and(|sources| sources.contains(source))
    }

    /// True once any source has been voted for on this item.
    pub fn has_voted_on(&self, thread_id: &str, post_id: &str) -> bool {
        self.votes
            .get(&key(thread_id, post_id))
            .is_some_and(|sources| !sources.is_empty())
    }

    /// Returns false if the vote was already recorded.
    pub fn record(&mut self, thread_id: &str, post_id: &str, source: &str) -> bool {
        self.votes
            .entry(key(thread_id, post_id))
            .or_default()
            .insert(source.to_string())
    }

    /// Returns false if there was nothing to clear.
    pub fn clear(&mut self, thread_id: &str, post_id: &str, source: &str) -> bool {
        let item = key(thread_id, post_id);
        let Some(sources) = self.votes.get_mut(&item) else {
            return false;
        };
        let removed = sources.remove(source);
        if sources.is_empty() {
            self.votes.remove(&item);
        }
        removed
    }

    pub fn voted_sources(&self, thread_id: &str, post_id: &str) -> Vec<TranslationSource> {
        self.votes
            .get(&key(thread_id, post_id))
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of items (thread, post) with at least one vote.
    pub fn items_voted(&self) -> usize {
        self.votes.len()
    }
}

fn key(thread_id: &str, post_id: &str) -> (String, String) {
    (thread_id.to_string(), post_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let mut tracker = VoteSessionTracker::new();
        assert!(!tracker.has_voted("42", "7", "gpt-4o"));
        assert!(!tracker.has_voted_on("42", "7"));

        assert!(tracker.record("42", "7", "gpt-4o"));
        assert!(!tracker.record("42", "7", "gpt-4o"));
        assert!(tracker.has_voted("42", "7", "gpt-4o"));
        assert!(tracker.has_voted_on("42", "7"));
        assert!(!tracker.has_voted("42", "7", "claude"));
        assert!(!tracker.has_voted_on("42", "8"));

        assert!(tracker.clear("42", "7", "gpt-4o"));
        assert!(!tracker.clear("42", "7", "gpt-4o"));
        assert!(!tracker.has_voted_on("42", "7"));
        assert_eq!(tracker.items_voted(), 0);
    }

    #[test]
    fn test_items_are_independent() {
        let mut tracker = VoteSessionTracker::new();
        tracker.record("42", "7", "gpt-4o");
        tracker.record("42", "8", "claude");
        tracker.record("43", "7", "gemini");

        assert_eq!(tracker.items_voted(), 3);
        assert_eq!(tracker.voted_sources("42", "7"), vec!["gpt-4o"]);
        assert!(tracker.voted_sources("99", "1").is_empty());

        tracker.clear("42", "8", "claude");
        assert!(tracker.has_voted_on("43", "7"));
        assert_eq!(tracker.items_voted(), 2);
    }
}
