//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure computations over entities.
pub mod services;

pub use entities::{BlogPost, ContentIdentity, Draft, ImageSlot, PostFields, PostId};
pub use errors::{ContentError, FetchError, RelayError, StorageError};
pub use ports::{ContentStorePort, FormRelayPort, ImageFetchPort, KeyValueStorePort};
pub use services::ValidationErrors;
