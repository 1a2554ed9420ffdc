pub mod dbs;
pub mod error;
pub mod store;
pub mod timeout;

#[cfg(feature = "mongodb")]
pub mod builder;

pub use dbs::memory::MemoryVoteStore;
pub use error::{PersistError, Result};
pub use store::VoteStore;
pub use timeout::TimeoutVoteStore;

#[cfg(feature = "mongodb")]
pub use builder::VoteStoreBuilder;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::{MongoSettings, MongoVoteStore};

pub use tolk_types::{VoteRecord, VoteTally};
