use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity at which a pseudonym mapping is held fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeGranularity {
    Thread,
    #[default]
    Post,
}

impl ScopeGranularity {
    /// Scope key for a post's translation columns.
    pub fn key_for(&self, thread_id: &str, post_id: &str) -> ScopeKey {
        match self {
            ScopeGranularity::Thread => ScopeKey::thread(thread_id),
            ScopeGranularity::Post => ScopeKey::post(thread_id, post_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScopeKey {
    Thread { thread_id: String },
    Post { thread_id: String, post_id: String },
}

impl ScopeKey {
    pub fn thread(thread_id: impl Into<String>) -> Self {
        ScopeKey::Thread {
            thread_id: thread_id.into(),
        }
    }

    pub fn post(thread_id: impl Into<String>, post_id: impl Into<String>) -> Self {
        ScopeKey::Post {
            thread_id: thread_id.into(),
            post_id: post_id.into(),
        }
    }

    pub fn thread_id(&self) -> &str {
        match self {
            ScopeKey::Thread { thread_id } | ScopeKey::Post { thread_id, .. } => thread_id,
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Thread { thread_id } => write!(f, "thread:{}", thread_id),
            ScopeKey::Post { thread_id, post_id } => write!(f, "post:{}/{}", thread_id, post_id),
        }
    }
}
