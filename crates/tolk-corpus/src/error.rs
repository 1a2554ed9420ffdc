use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corpus is not valid thread JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate thread id in corpus: {0}")]
    DuplicateThread(String),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
