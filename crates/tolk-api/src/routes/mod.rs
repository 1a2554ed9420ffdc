pub mod health;
pub mod sessions;
pub mod stats;
pub mod threads;
pub mod votes;
