pub mod records;
pub mod scope;
pub mod vote;

mod ids;

pub use records::{PostRecord, ThreadRecord, TokenUsage, TranslatedText, UsageTotals};
pub use scope::{ScopeGranularity, ScopeKey};
pub use vote::{VoteRecord, VoteTally};

/// Opaque identifier of a translation provider/model, e.g. `"gpt-4o"`.
pub type TranslationSource = String;
