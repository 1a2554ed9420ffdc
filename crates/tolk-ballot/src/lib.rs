pub mod error;
pub mod letters;
pub mod mapper;
pub mod session;
pub mod stats;
pub mod tracker;

pub use error::{BallotError, Result};
pub use mapper::{AnonymizationMapper, DisplayMapping};
pub use session::SessionContext;
pub use stats::{Distribution, SourceShare};
pub use tracker::VoteSessionTracker;

pub use tolk_types::{ScopeGranularity, ScopeKey, TranslationSource, VoteTally};
