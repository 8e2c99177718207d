//! Network image fetcher.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::memory_cache::VerifiedImageCache;
use crate::domain::errors::FetchError;
use crate::domain::ports::{FetchResult, FetchedImage, ImageFetchPort};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpImageFetcherConfig {
    /// Verified URLs remembered in memory.
    pub cache_size: usize,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpImageFetcherConfig {
    fn default() -> Self {
        Self {
            cache_size: super::memory_cache::DEFAULT_CACHE_SIZE,
            max_concurrent_downloads: 4,
            timeout_secs: 20,
        }
    }
}

/// Downloads images and proves they decode.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    cache: VerifiedImageCache,
    semaphore: Arc<Semaphore>,
}

impl std::fmt::Debug for HttpImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageFetcher").finish_non_exhaustive()
    }
}

impl HttpImageFetcher {
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &HttpImageFetcherConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            cache: VerifiedImageCache::new(config.cache_size),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1))),
        })
    }

    /// Hit statistics of the verified-URL cache.
    #[must_use]
    pub fn cache_stats(&self) -> super::memory_cache::CacheStats {
        self.cache.stats()
    }

    async fn download(&self, url: &str) -> FetchResult<Bytes> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Network("request timed out".to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read body: {e}")))
    }
}

/// Decodes `bytes` off the async runtime.
///
/// # Errors
/// Returns [`FetchError::Decode`] if the bytes are not a supported image.
pub async fn verify_bytes(bytes: Bytes) -> FetchResult<FetchedImage> {
    let len = bytes.len();
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::Decode(format!("decode task panicked: {e}")))?
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(FetchedImage::new(decoded, len))
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedImage> {
        if let Some(cached) = self.cache.get(url).await {
            return Ok(cached);
        }

        debug!(url = %url, "Downloading image");
        let bytes = self.download(url).await.inspect_err(|e| {
            warn!(url = %url, error = %e, "Image download failed");
        })?;

        let fetched = verify_bytes(bytes).await?;
        self.cache.put(url, fetched.clone()).await;
        Ok(fetched)
    }
}
