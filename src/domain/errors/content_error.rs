//! Content store error types.

use thiserror::Error;

use super::StorageError;

/// Failures of a content store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ContentError {
    #[error("post not found: {id}")]
    NotFound { id: String },

    #[error("network error talking to content store: {message}")]
    Network { message: String },

    #[error("content store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response from content store: {message}")]
    InvalidResponse { message: String },

    #[error("local storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ContentError {
    /// Creates not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns whether the store could not be reached at all.
    ///
    /// Unreachable stores are replaced by demo data or local storage.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
