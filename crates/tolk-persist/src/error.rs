use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    /// The backing store is unreachable or did not answer in time.
    /// Callers fall back to a read-only, vote-disabled view.
    #[error("Vote storage unavailable: {0}")]
    StorageUnavailable(String),

    #[cfg(feature = "mongodb")]
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON deserialization error: {0}")]
    BsonDeserialization(#[from] bson::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PersistError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PersistError::StorageUnavailable(_))
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for PersistError {
    fn from(e: mongodb::error::Error) -> Self {
        PersistError::StorageUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
