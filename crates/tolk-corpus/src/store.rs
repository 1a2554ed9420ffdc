use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use tolk_types::{PostRecord, ThreadRecord, TranslationSource, UsageTotals};

use crate::error::{CorpusError, Result};

/// Immutable collection of translated threads, in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    threads: Vec<ThreadRecord>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// The "nothing to display" corpus.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            threads = corpus.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let threads: Vec<ThreadRecord> = serde_json::from_reader(reader)?;
        Self::from_threads(threads)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let threads: Vec<ThreadRecord> = serde_json::from_str(raw)?;
        Self::from_threads(threads)
    }

    pub fn from_threads(threads: Vec<ThreadRecord>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(threads.len());
        for (idx, thread) in threads.iter().enumerate() {
            if by_id.insert(thread.id.clone(), idx).is_some() {
                return Err(CorpusError::DuplicateThread(thread.id.clone()));
            }
        }
        Ok(Self { threads, by_id })
    }

    pub fn threads(&self) -> &[ThreadRecord] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn thread(&self, thread_id: &str) -> Option<&ThreadRecord> {
        self.by_id.get(thread_id).map(|&idx| &self.threads[idx])
    }

    pub fn post(&self, thread_id: &str, post_id: &str) -> Option<&PostRecord> {
        self.thread(thread_id)?.post(post_id)
    }

    /// Token usage per source summed over every thread.
    pub fn token_usage(&self) -> BTreeMap<TranslationSource, UsageTotals> {
        let mut totals: BTreeMap<TranslationSource, UsageTotals> = BTreeMap::new();
        for thread in &self.threads {
            for (source, usage) in thread.token_usage() {
                totals.entry(source).or_default().merge(&usage);
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::empty();
        assert!(corpus.is_empty());
        assert!(corpus.thread("1").is_none());
        assert!(corpus.token_usage().is_empty());
    }

    #[test]
    fn test_duplicate_thread_rejected() {
        let raw = r#"[
            {"id": 1, "title": "a", "posts": []},
            {"id": "1", "title": "b", "posts": []}
        ]"#;
        let err = Corpus::from_json_str(raw).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateThread(id) if id == "1"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Corpus::from_json_str("{\"not\": \"a list\"}").unwrap_err();
        assert!(matches!(err, CorpusError::Parse(_)));
    }
}
