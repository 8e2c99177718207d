//! Image fetch error types.

use thiserror::Error;

/// Errors that can occur fetching an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network error during download.
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// Bytes were not a decodable image.
    #[error("decode error: {0}")]
    Decode(String),
}
