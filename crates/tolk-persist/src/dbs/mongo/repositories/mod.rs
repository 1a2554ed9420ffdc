mod vote;

pub use vote::MongoVoteRepository;
