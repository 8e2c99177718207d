//! Drives the image slots of one screen.
//!
//! The coordinator owns a keyed set of [`ImageSlot`]s, issues fetches for the
//! visible rows plus a small look-ahead, and folds completion events back into
//! the slots. Fetches run in spawned tasks and are never cancelled; a result
//! that no longer matches its slot is dropped.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::application::services::diagnostics::PerformanceRecorder;
use crate::domain::entities::{FailureOutcome, FallbackSources, FetchRequest, ImageSlot, LoadMode};
use crate::domain::ports::{FetchResult, FetchedImage, ImageFetchPort};

/// Rows past the visible range whose images are fetched early.
pub const LOOKAHEAD_ROWS: usize = 3;

/// Default dimmed reveal after a successful load.
pub const DEFAULT_REVEAL: Duration = Duration::from_millis(300);

/// Metric name for attempt timings.
pub const IMAGE_LOAD_METRIC: &str = "image_load";

/// A finished fetch reported back to the UI loop.
#[derive(Debug, Clone)]
pub struct ImageEvent {
    pub key: String,
    pub request: FetchRequest,
    pub result: FetchResult<FetchedImage>,
    pub elapsed: Duration,
}

struct SlotEntry {
    slot: ImageSlot,
    loaded_at: Option<Instant>,
    pixels: Option<Arc<DynamicImage>>,
}

impl SlotEntry {
    fn new(slot: ImageSlot) -> Self {
        Self {
            slot,
            loaded_at: None,
            pixels: None,
        }
    }

    fn reset(&mut self) {
        self.loaded_at = None;
        self.pixels = None;
    }
}

/// Owns the image slots of a screen.
pub struct ImageLoadCoordinator {
    fetcher: Arc<dyn ImageFetchPort>,
    fallbacks: FallbackSources,
    recorder: Option<PerformanceRecorder>,
    event_tx: mpsc::UnboundedSender<ImageEvent>,
    order: Vec<String>,
    slots: HashMap<String, SlotEntry>,
    reveal: Duration,
}

impl ImageLoadCoordinator {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ImageFetchPort>,
        fallbacks: FallbackSources,
        event_tx: mpsc::UnboundedSender<ImageEvent>,
    ) -> Self {
        Self {
            fetcher,
            fallbacks,
            recorder: None,
            event_tx,
            order: Vec::new(),
            slots: HashMap::new(),
            reveal: DEFAULT_REVEAL,
        }
    }

    /// Records every attempt's duration.
    #[must_use]
    pub fn with_recorder(mut self, recorder: PerformanceRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    #[must_use]
    pub const fn with_reveal(mut self, reveal: Duration) -> Self {
        self.reveal = reveal;
        self
    }

    /// Replaces the lazily loaded rows of the screen, in display order.
    ///
    /// Rows whose key survives keep their slot; a changed source resets it.
    pub fn set_rows<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, String, Option<String>)>,
    {
        let mut slots = HashMap::new();
        let mut order = Vec::new();

        for (key, source, label) in rows {
            let entry = match self.slots.remove(&key) {
                Some(mut entry) => {
                    if entry.slot.set_source(source, label) {
                        entry.reset();
                    }
                    entry
                }
                None => SlotEntry::new(ImageSlot::new(source, label, LoadMode::Lazy)),
            };
            order.push(key.clone());
            slots.insert(key, entry);
        }

        self.order = order;
        self.slots = slots;
    }

    /// Adds or updates a single slot outside the row order.
    ///
    /// An eager slot starts fetching immediately.
    pub fn upsert(&mut self, key: &str, source: &str, label: Option<String>, mode: LoadMode) {
        if let Some(entry) = self.slots.get_mut(key) {
            if entry.slot.set_source(source, label) {
                entry.reset();
                if let Some(request) = entry.slot.current_request() {
                    self.spawn_fetch(key.to_string(), request);
                }
            }
            return;
        }

        let slot = ImageSlot::new(source, label, mode);
        let request = slot.current_request();
        self.slots.insert(key.to_string(), SlotEntry::new(slot));
        if let Some(request) = request {
            self.spawn_fetch(key.to_string(), request);
        }
    }

    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&ImageSlot> {
        self.slots.get(key).map(|e| &e.slot)
    }

    /// Decoded pixels of a loaded slot.
    #[must_use]
    pub fn pixels(&self, key: &str) -> Option<&Arc<DynamicImage>> {
        self.slots.get(key).and_then(|e| e.pixels.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Visibility signal for the rows in `visible`.
    ///
    /// Reveals those rows plus [`LOOKAHEAD_ROWS`] after them. Returns how many
    /// fetches were issued.
    pub fn set_visible(&mut self, visible: Range<usize>) -> usize {
        let end = visible.end.saturating_add(LOOKAHEAD_ROWS).min(self.order.len());
        let start = visible.start.min(end);
        let mut requests = Vec::new();

        for key in &self.order[start..end] {
            if let Some(entry) = self.slots.get_mut(key)
                && let Some(request) = entry.slot.reveal()
            {
                requests.push((key.clone(), request));
            }
        }

        let issued = requests.len();
        for (key, request) in requests {
            self.spawn_fetch(key, request);
        }
        issued
    }

    /// Folds a completion into its slot. Returns true if the slot changed.
    pub fn handle_event(&mut self, event: ImageEvent) -> bool {
        let Some(entry) = self.slots.get_mut(&event.key) else {
            return false;
        };
        if entry.slot.current_url() != event.request.url {
            trace!(key = %event.key, "Dropping result for superseded source");
            return false;
        }

        let changed = match event.result {
            Ok(image) => {
                let applied = entry
                    .slot
                    .complete(event.request.generation, image.width, image.height);
                if applied {
                    entry.loaded_at = Some(Instant::now());
                    entry.pixels = Some(image.pixels);
                }
                applied
            }
            Err(e) => {
                debug!(
                    key = %event.key,
                    url = %event.request.url,
                    error = %e,
                    "Image attempt failed"
                );
                match entry.slot.fail(event.request.generation, &self.fallbacks) {
                    FailureOutcome::Ignored => false,
                    FailureOutcome::Retry(request) => {
                        self.spawn_fetch(event.key.clone(), request);
                        true
                    }
                    FailureOutcome::Failed => true,
                }
            }
        };

        if changed && let Some(recorder) = &self.recorder {
            recorder.record(IMAGE_LOAD_METRIC, event.elapsed);
        }
        changed
    }

    /// Returns true while a freshly loaded image should render dimmed.
    #[must_use]
    pub fn is_revealing(&self, key: &str) -> bool {
        self.slots
            .get(key)
            .and_then(|e| e.loaded_at)
            .is_some_and(|at| at.elapsed() < self.reveal)
    }

    /// Returns true if any slot is mid-reveal, so the UI keeps redrawing.
    #[must_use]
    pub fn any_revealing(&self) -> bool {
        self.slots
            .values()
            .filter_map(|e| e.loaded_at)
            .any(|at| at.elapsed() < self.reveal)
    }

    fn spawn_fetch(&self, key: String, request: FetchRequest) {
        let fetcher = self.fetcher.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = fetcher.fetch(&request.url).await;
            let _ = tx.send(ImageEvent {
                key,
                request,
                result,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Runs the whole cascade for one image and returns the terminal slot.
    pub async fn resolve(
        fetcher: &dyn ImageFetchPort,
        fallbacks: &FallbackSources,
        source: &str,
        label: Option<String>,
        recorder: Option<&PerformanceRecorder>,
    ) -> ImageSlot {
        let mut slot = ImageSlot::new(source, label, LoadMode::Eager);

        while let Some(request) = slot.current_request() {
            let started = Instant::now();
            let result = fetcher.fetch(&request.url).await;
            if let Some(recorder) = recorder {
                recorder.record(IMAGE_LOAD_METRIC, started.elapsed());
            }
            match result {
                Ok(image) => {
                    slot.complete(request.generation, image.width, image.height);
                }
                Err(_) => {
                    if matches!(
                        slot.fail(request.generation, fallbacks),
                        FailureOutcome::Ignored
                    ) {
                        break;
                    }
                }
            }
        }

        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Attempt, FallbackKind, ImageLoadState, PerformanceEntry};
    use crate::domain::ports::mocks::ScriptedFetcher;
    use crate::domain::ports::{JsonStoreExt, PERFORMANCE_METRICS_KEY};
    use crate::infrastructure::storage::MemoryKeyValueStore;

    fn fallbacks() -> FallbackSources {
        FallbackSources {
            team: "https://img.test/team.jpg".to_string(),
            blog: "https://img.test/blog.jpg".to_string(),
            generic: "https://img.test/generic.jpg".to_string(),
        }
    }

    fn rows(n: usize) -> Vec<(String, String, Option<String>)> {
        (0..n)
            .map(|i| (format!("p{i}"), format!("https://img.test/{i}.jpg"), None))
            .collect()
    }

    async fn drain(
        coordinator: &mut ImageLoadCoordinator,
        rx: &mut mpsc::UnboundedReceiver<ImageEvent>,
    ) {
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(50), rx.recv()).await
        {
            coordinator.handle_event(event);
        }
    }

    #[tokio::test]
    async fn test_team_label_falls_back_to_team_source() {
        let fetcher = ScriptedFetcher::new().failing("https://img.test/portrait.jpg");
        let slot = ImageLoadCoordinator::resolve(
            &fetcher,
            &fallbacks(),
            "https://img.test/portrait.jpg",
            Some("Our Team lead".to_string()),
            None,
        )
        .await;

        assert_eq!(
            fetcher.calls(),
            ["https://img.test/portrait.jpg", "https://img.test/team.jpg"]
        );
        assert!(matches!(
            slot.state(),
            ImageLoadState::Loaded {
                attempt: Attempt::Fallback(FallbackKind::Team),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_both_sources_failing_stops_after_two_attempts() {
        let fetcher = ScriptedFetcher::new()
            .failing("https://img.test/broken.jpg")
            .failing("https://img.test/generic.jpg");
        let slot = ImageLoadCoordinator::resolve(
            &fetcher,
            &fallbacks(),
            "https://img.test/broken.jpg",
            None,
            None,
        )
        .await;

        assert!(slot.state().is_error());
        assert_eq!(slot.caption(), "Image unavailable");
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_only_visible_rows_and_lookahead_are_fetched() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = ImageLoadCoordinator::new(fetcher.clone(), fallbacks(), tx);
        coordinator.set_rows(rows(10));

        assert_eq!(coordinator.set_visible(0..2), 2 + LOOKAHEAD_ROWS);
        drain(&mut coordinator, &mut rx).await;

        assert_eq!(fetcher.calls().len(), 5);
        assert!(coordinator.slot("p4").is_some_and(|s| s.state().is_loaded()));
        assert!(coordinator.slot("p5").is_some_and(|s| s.state().is_pending()));

        assert_eq!(coordinator.set_visible(0..2), 0);
    }

    #[tokio::test]
    async fn test_stale_result_after_source_change_is_ignored() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = ImageLoadCoordinator::new(fetcher, fallbacks(), tx);
        coordinator.set_rows(rows(1));
        coordinator.set_visible(0..1);

        let event = rx.recv().await.expect("fetch completes");
        coordinator.set_rows(vec![(
            "p0".to_string(),
            "https://img.test/replaced.jpg".to_string(),
            None,
        )]);

        assert!(!coordinator.handle_event(event));
        assert!(coordinator.slot("p0").is_some_and(|s| s.state().is_pending()));
    }

    #[tokio::test]
    async fn test_eager_slot_loads_without_visibility() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = ImageLoadCoordinator::new(fetcher, fallbacks(), tx);

        coordinator.upsert("cover", "https://img.test/cover.jpg", None, LoadMode::Eager);
        drain(&mut coordinator, &mut rx).await;

        assert!(coordinator.slot("cover").is_some_and(|s| s.state().is_loaded()));
        assert!(coordinator.is_revealing("cover"));
        assert_eq!(coordinator.pixels("cover").map(|p| p.width()), Some(8));

        coordinator.upsert("cover", "https://img.test/other.jpg", None, LoadMode::Eager);
        assert!(coordinator.pixels("cover").is_none());
        assert!(!coordinator.is_revealing("cover"));
    }

    #[tokio::test]
    async fn test_attempt_durations_are_recorded() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let recorder = PerformanceRecorder::new(store.clone());
        let fetcher = ScriptedFetcher::new().failing("https://img.test/a.jpg");

        ImageLoadCoordinator::resolve(
            &fetcher,
            &fallbacks(),
            "https://img.test/a.jpg",
            Some("Blog cover".to_string()),
            Some(&recorder),
        )
        .await;

        let entries: Vec<PerformanceEntry> =
            store.get_json(PERFORMANCE_METRICS_KEY).unwrap_or_default();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.metric == IMAGE_LOAD_METRIC));
    }
}
