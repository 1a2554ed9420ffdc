pub mod error;
pub mod store;

pub use error::{CorpusError, Result};
pub use store::Corpus;

pub use tolk_types::{PostRecord, ThreadRecord, TokenUsage, TranslatedText, UsageTotals};
