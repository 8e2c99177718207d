//! Image fetching infrastructure.
//!
//! This module provides:
//! - HTTP download with status checks and decode verification
//! - Memory caching of verified URLs with LRU eviction

pub mod http_fetcher;
pub mod memory_cache;

pub use http_fetcher::{HttpImageFetcher, HttpImageFetcherConfig, verify_bytes};
pub use memory_cache::{CacheStats, VerifiedImageCache};
