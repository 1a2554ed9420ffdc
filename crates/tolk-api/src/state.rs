use std::sync::Arc;

use tolk_corpus::Corpus;
use tolk_persist::VoteStore;

use crate::config::Config;
use crate::sessions::SessionRegistry;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub corpus: Arc<Corpus>,
    pub store: Arc<dyn VoteStore>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config, corpus: Corpus, store: Arc<dyn VoteStore>) -> Self {
        let sessions = SessionRegistry::new(config.ballot.scope, config.session_ttl());
        Self {
            config: Arc::new(config),
            corpus: Arc::new(corpus),
            store,
            sessions: Arc::new(sessions),
        }
    }

    /// Whether votes can be taken right now. Failures downgrade the page to read-only.
    pub async fn voting_enabled(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Voting disabled: {}", e);
                false
            }
        }
    }
}
