//! Domain error types.

mod content_error;
mod fetch_error;
mod relay_error;
mod storage_error;

pub use content_error::ContentError;
pub use fetch_error::FetchError;
pub use relay_error::RelayError;
pub use storage_error::StorageError;
