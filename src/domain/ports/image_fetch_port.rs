//! Port definition for fetching images.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::FetchError;

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// A successfully fetched and decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub width: u32,
    pub height: u32,
    /// Encoded size in bytes.
    pub bytes: usize,
    pub pixels: Arc<image::DynamicImage>,
}

impl FetchedImage {
    #[must_use]
    pub fn new(pixels: image::DynamicImage, bytes: usize) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            bytes,
            pixels: Arc::new(pixels),
        }
    }
}

/// Port for loading images by URL.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Fetches and verifies an image.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedImage>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;

    /// Fetcher that fails a fixed set of URLs and records every call.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        /// Every URL succeeds.
        pub fn new() -> Self {
            Self::default()
        }

        /// Fails the given URL.
        #[must_use]
        pub fn failing(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        /// URLs fetched so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ImageFetchPort for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> FetchResult<FetchedImage> {
            self.calls.lock().push(url.to_string());
            if self.failing.contains(url) {
                Err(FetchError::Status(404))
            } else {
                Ok(FetchedImage::new(image::DynamicImage::new_rgb8(8, 6), 1024))
            }
        }
    }
}
