use thiserror::Error;
use tolk_types::ScopeKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    /// Resolution was attempted before a mapping was assigned for the scope.
    #[error("No display mapping assigned for scope {0}")]
    UnknownScope(ScopeKey),

    #[error("{display_name} is out of range for a mapping of {sources} sources")]
    OutOfRange { display_name: String, sources: usize },

    #[error("Not a display name: {0:?}")]
    InvalidDisplayName(String),

    #[error("Cannot assign a display mapping over an empty source set")]
    EmptySourceSet,

    #[error("Source {model} is not part of the mapping for scope {scope}")]
    UnknownSource { scope: ScopeKey, model: String },
}

pub type Result<T> = std::result::Result<T, BallotError>;
