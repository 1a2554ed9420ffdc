use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use tolk_ballot::SessionContext;
use tolk_types::ScopeGranularity;

pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Live viewing sessions. Each entry owns its own mapping cache and vote tracker.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    granularity: ScopeGranularity,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(granularity: ScopeGranularity, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            granularity,
            ttl,
        }
    }

    pub fn granularity(&self) -> ScopeGranularity {
        self.granularity
    }

    /// Start a session, discarding idle ones first.
    pub async fn start(&self) -> Uuid {
        self.sweep_idle().await;

        let context = SessionContext::new(self.granularity);
        let id = context.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(context)));

        tracing::info!(session_id = %id, "Session started");
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Drop sessions idle for longer than the ttl. Returns how many were dropped.
    pub async fn sweep_idle(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // A session locked by an in-flight request is in use, so it stays.
        sessions.retain(|_, session| match session.try_lock() {
            Ok(context) => !context.is_idle(now, self.ttl),
            Err(_) => true,
        });
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Idle sessions discarded");
        }
        dropped
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_get_end() {
        let registry = SessionRegistry::new(ScopeGranularity::Post, Duration::hours(1));
        let id = registry.start().await;

        let session = registry.get(id).await.unwrap();
        assert_eq!(session.lock().await.id(), id);
        assert_eq!(registry.len().await, 1);

        assert!(registry.end(id).await);
        assert!(!registry.end(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_swept() {
        let registry = SessionRegistry::new(ScopeGranularity::Post, Duration::zero());
        registry.start().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert_eq!(registry.sweep_idle().await, 1);
        assert!(registry.is_empty().await);
    }
}
