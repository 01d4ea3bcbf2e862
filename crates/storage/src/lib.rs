#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonFileStore;
pub use repository::{InMemoryStore, SnapshotStore, StorageError, load_or_default};
