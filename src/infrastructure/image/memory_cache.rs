//! In-memory LRU of recently decoded images.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::trace;

use crate::domain::entities::ImageId;
use crate::domain::ports::FetchedImage;

/// Default number of decoded images kept.
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// LRU keyed by URL hash holding decoded images.
///
/// Failures are never cached, so a broken URL is fetched again the next time
/// a slot asks for it.
pub struct VerifiedImageCache {
    cache: RwLock<LruCache<ImageId, FetchedImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl VerifiedImageCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up `url`, promoting it on a hit.
    pub async fn get(&self, url: &str) -> Option<FetchedImage> {
        let id = ImageId::from_url(url);
        let found = self.cache.write().await.get(&id).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Verified image cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub async fn put(&self, url: &str, image: FetchedImage) {
        self.cache.write().await.put(ImageId::from_url(url), image);
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
        }
    }
}

impl Default for VerifiedImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Image cache: {:.1}% hit rate ({} hits, {} misses)",
            self.hit_rate, self.hits, self.misses
        )
    }
}
