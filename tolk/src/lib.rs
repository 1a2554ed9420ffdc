//! # Tolk - blind comparison of machine translations
//!
//! Readers see several translations of the same forum post side by side,
//! labelled `Model A`, `Model B` and so on, and vote for the best one. The
//! real source behind a label is revealed only after voting for it.
//!
//! ## Quick Start
//!
//! ```rust
//! use tolk::prelude::*;
//!
//! let mut session = SessionContext::with_mapper(
//!     ScopeGranularity::Post,
//!     AnonymizationMapper::with_seed(7),
//! );
//! let scope = session.post_scope("42", "9001");
//! session.assign(scope, ["gpt-4o", "deepseek-chat"]).unwrap();
//!
//! let source = session.source_for("42", "9001", "Model A").unwrap();
//! session.record_vote("42", "9001", &source);
//! assert!(session.can_see_results("42", "9001"));
//! ```
//!
//! ## Architecture
//!
//! - **tolk-types**: Corpus records, scope keys, vote records and tallies
//! - **tolk-corpus**: Loads the translated thread corpus
//! - **tolk-ballot**: Pseudonym mapping, per-session vote tracking, statistics
//! - **tolk-persist**: Vote storage (in-memory, MongoDB behind the `mongodb` feature)

pub use tolk_ballot as ballot;
pub use tolk_corpus as corpus;
pub use tolk_persist as persist;
pub use tolk_types as types;

pub mod prelude {
    pub use tolk_ballot::{
        AnonymizationMapper, BallotError, DisplayMapping, Distribution, SessionContext,
        SourceShare, VoteSessionTracker,
    };
    pub use tolk_corpus::{Corpus, CorpusError};
    pub use tolk_persist::{MemoryVoteStore, PersistError, TimeoutVoteStore, VoteStore};
    pub use tolk_types::{
        PostRecord, ScopeGranularity, ScopeKey, ThreadRecord, TranslationSource, VoteRecord,
        VoteTally,
    };

    #[cfg(feature = "mongodb")]
    pub use tolk_persist::{MongoVoteStore, VoteStoreBuilder};
}
