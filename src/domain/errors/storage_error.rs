//! Local storage error types.

use thiserror::Error;

/// Failures of the key-value store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("storage quota exceeded: writing {key} needs {required} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        required: usize,
        available: usize,
    },

    #[error("failed to serialize value for {key}: {message}")]
    Serialization { key: String, message: String },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    /// Creates serialization error.
    #[must_use]
    pub fn serialization(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Serialization {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Creates unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns whether the write could succeed after freeing space.
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
