pub mod merge;
pub mod repository;

pub use merge::{add_chat_entry, add_document, merge_facts, MergeOutcome};
pub use repository::{JsonFileRepository, MemoryRepository, RecordRepository};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on record store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Atomic rename of record file failed: {0}")]
    Persist(String),
}
