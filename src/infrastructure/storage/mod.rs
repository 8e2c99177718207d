//! Local key-value storage adapters.

mod file_store;
mod memory_store;

pub use file_store::{DEFAULT_QUOTA_BYTES, FileKeyValueStore, STORAGE_FILE_NAME};
pub use memory_store::MemoryKeyValueStore;
