//! Infrastructure layer with storage and remote service adapters.

/// Application configuration.
pub mod config;
/// Content store and analytics adapters.
pub mod content;
/// Image fetching and caching.
pub mod image;
/// Lead form relay.
pub mod relay;
/// Local key-value storage.
pub mod storage;

pub use config::{AppConfig, CliArgs, Command, ConfigLoader, LogLevel};
pub use content::{
    DemoAnalytics, DemoContentStore, LocalContentStore, RestAnalytics, RestContentStore,
};
pub use image::{CacheStats, HttpImageFetcher, HttpImageFetcherConfig, VerifiedImageCache};
pub use relay::HttpFormRelay;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
