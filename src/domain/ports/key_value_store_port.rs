//! Port for the string-valued local key-value store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::errors::StorageError;

/// Storage key of the local post collection.
pub const POSTS_KEY: &str = "blog-posts";
/// Storage key of caught error records.
pub const ERROR_LOGS_KEY: &str = "errorLogs";
/// Storage key of timing samples.
pub const PERFORMANCE_METRICS_KEY: &str = "performanceMetrics";

/// Synchronous key-value storage with string values.
/// Implementations must be thread-safe.
pub trait KeyValueStorePort: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns error on quota or I/O failure.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Missing keys are not an error.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Lists stored keys.
    fn keys(&self) -> Vec<String>;
}

/// JSON helpers over any key-value store.
pub trait JsonStoreExt: KeyValueStorePort {
    /// Reads and deserializes a value.
    ///
    /// Unreadable values and values with an incompatible shape are treated as
    /// absent.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Failed to read from storage");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Ignoring stored value with unexpected shape");
                None
            }
        }
    }

    /// Serializes and writes a value.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::serialization(key, e))?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStorePort + ?Sized> JsonStoreExt for S {}
