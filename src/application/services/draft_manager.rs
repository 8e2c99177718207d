//! Draft persistence: autosave, recovery and discard.
//!
//! Drafts are a best-effort safety net. The editor's in-memory fields stay the
//! source of truth, so every storage failure here is reported and swallowed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

use crate::application::services::diagnostics::ErrorReporter;
use crate::domain::entities::{ContentIdentity, Draft, PostFields};
use crate::domain::ports::{JsonStoreExt, KeyValueStorePort};

/// Default time between autosave ticks.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Result of one autosave tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// Title and body were both empty, nothing written.
    Skipped,
    /// Draft written at the given time.
    Saved(DateTime<Utc>),
    /// Storage refused the write; editing continues.
    Failed(String),
}

/// Saves, loads and clears drafts keyed by content identity.
#[derive(Clone)]
pub struct DraftManager {
    store: Arc<dyn KeyValueStorePort>,
    reporter: ErrorReporter,
}

impl DraftManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>, reporter: ErrorReporter) -> Self {
        Self { store, reporter }
    }

    /// Writes `fields` as the draft for `identity` unless title and body are
    /// both empty. Overwrites any previous draft under the same key.
    pub fn autosave(&self, identity: &ContentIdentity, fields: &PostFields) -> AutosaveOutcome {
        if fields.is_blank() {
            return AutosaveOutcome::Skipped;
        }

        let now = Utc::now();
        let draft = Draft::new(fields.clone(), now);
        let key = Draft::storage_key(identity);

        match self.store.set_json(&key, &draft) {
            Ok(()) => {
                debug!(key = %key, "Draft autosaved");
                AutosaveOutcome::Saved(now)
            }
            Err(e) => {
                self.reporter.report("autosave", &e);
                AutosaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Reads the stored draft for `identity`, if any.
    #[must_use]
    pub fn load(&self, identity: &ContentIdentity) -> Option<Draft> {
        self.store.get_json(&Draft::storage_key(identity))
    }

    /// Returns a draft worth offering when the editor opens.
    ///
    /// Only new content is offered recovery, and only when the stored draft
    /// has a title or body.
    #[must_use]
    pub fn offer_recovery(&self, identity: &ContentIdentity) -> Option<Draft> {
        if !identity.is_new() {
            return None;
        }
        self.load(identity).filter(Draft::is_recoverable)
    }

    /// Removes the draft for `identity`. Returns false if storage refused.
    pub fn discard(&self, identity: &ContentIdentity) -> bool {
        let key = Draft::storage_key(identity);
        match self.store.remove(&key) {
            Ok(()) => {
                info!(key = %key, "Draft discarded");
                true
            }
            Err(e) => {
                self.reporter.report("discard_draft", &e);
                false
            }
        }
    }
}

/// Background task that autosaves the latest fields on a fixed interval.
///
/// The editor pushes every change through [`Autosaver::update`]; the task
/// only ever looks at the most recent value. Ticks while paused write nothing.
/// Dropping the autosaver stops it.
pub struct Autosaver {
    fields_tx: watch::Sender<PostFields>,
    paused: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Starts autosaving drafts for `identity` every `period`.
    ///
    /// The first tick fires one full period after spawning. Outcomes are sent
    /// to `outcome_tx` when given.
    #[must_use]
    pub fn spawn(
        manager: DraftManager,
        identity: ContentIdentity,
        initial: PostFields,
        period: Duration,
        outcome_tx: Option<mpsc::UnboundedSender<AutosaveOutcome>>,
    ) -> Self {
        let (fields_tx, fields_rx) = watch::channel(initial);
        let paused = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(Self::run(
            manager,
            identity,
            period,
            fields_rx,
            paused.clone(),
            outcome_tx,
        ));
        Self {
            fields_tx,
            paused,
            task,
        }
    }

    async fn run(
        manager: DraftManager,
        identity: ContentIdentity,
        period: Duration,
        mut fields_rx: watch::Receiver<PostFields>,
        paused: Arc<AtomicBool>,
        outcome_tx: Option<mpsc::UnboundedSender<AutosaveOutcome>>,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if paused.load(Ordering::Acquire) {
                        debug!(identity = %identity, "Autosave tick skipped while paused");
                        continue;
                    }
                    let fields = fields_rx.borrow_and_update().clone();
                    let outcome = manager.autosave(&identity, &fields);
                    if let Some(tx) = &outcome_tx
                        && tx.send(outcome).is_err()
                    {
                        break;
                    }
                }
                changed = fields_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        debug!(identity = %identity, "Autosave task stopped");
    }

    /// Publishes the editor's current fields.
    pub fn update(&self, fields: PostFields) {
        self.fields_tx.send_replace(fields);
    }

    /// Stops writing drafts until [`Autosaver::resume`].
    ///
    /// Used while a save is in flight so a tick cannot bring back a draft the
    /// save is about to discard.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PostId;
    use crate::domain::ports::mocks::FailingStore;
    use crate::infrastructure::storage::MemoryKeyValueStore;

    fn manager_with(store: Arc<dyn KeyValueStorePort>) -> DraftManager {
        let reporter = ErrorReporter::new(store.clone(), "test-session");
        DraftManager::new(store, reporter)
    }

    fn fields(title: &str, body: &str) -> PostFields {
        PostFields {
            title: title.to_string(),
            body: body.to_string(),
            ..PostFields::default()
        }
    }

    #[test]
    fn test_blank_fields_are_not_saved() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store.clone());

        let mut blank = PostFields::default();
        blank.excerpt = "excerpt alone does not count".to_string();

        assert_eq!(
            manager.autosave(&ContentIdentity::New, &blank),
            AutosaveOutcome::Skipped
        );
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_autosave_overwrites_previous_draft() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store);

        manager.autosave(&ContentIdentity::New, &fields("First", ""));
        manager.autosave(&ContentIdentity::New, &fields("", "second body"));

        let draft = manager.load(&ContentIdentity::New).expect("draft stored");
        assert_eq!(draft.fields.title, "");
        assert_eq!(draft.fields.body, "second body");
    }

    #[test]
    fn test_recovery_only_offered_for_new_content() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store);
        let existing = ContentIdentity::Existing(PostId::new("p1"));

        manager.autosave(&existing, &fields("Existing edit", "body"));
        assert!(manager.offer_recovery(&existing).is_none());
        assert!(manager.load(&existing).is_some());

        assert!(manager.offer_recovery(&ContentIdentity::New).is_none());
        manager.autosave(&ContentIdentity::New, &fields("Fresh", ""));
        assert!(manager.offer_recovery(&ContentIdentity::New).is_some());
    }

    #[test]
    fn test_blank_stored_draft_not_offered() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let draft = Draft::new(PostFields::default(), Utc::now());
        store
            .set_json("blog-draft-new", &draft)
            .expect("memory store accepts writes");

        let manager = manager_with(store);
        assert!(manager.offer_recovery(&ContentIdentity::New).is_none());
    }

    #[test]
    fn test_incompatible_draft_shape_is_absent() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set("blog-draft-new", "[1, 2, 3]")
            .expect("memory store accepts writes");

        let manager = manager_with(store);
        assert!(manager.load(&ContentIdentity::New).is_none());
    }

    #[test]
    fn test_discard_removes_draft() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store);

        manager.autosave(&ContentIdentity::New, &fields("Title", "Body"));
        assert!(manager.discard(&ContentIdentity::New));
        assert!(manager.load(&ContentIdentity::New).is_none());
    }

    #[test]
    fn test_storage_failure_is_swallowed() {
        let manager = manager_with(Arc::new(FailingStore));

        let outcome = manager.autosave(&ContentIdentity::New, &fields("Title", "Body"));
        assert!(matches!(outcome, AutosaveOutcome::Failed(_)));
        assert!(!manager.discard(&ContentIdentity::New));
        assert!(manager.load(&ContentIdentity::New).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosaver_writes_latest_fields_each_interval() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let autosaver = Autosaver::spawn(
            manager.clone(),
            ContentIdentity::New,
            PostFields::default(),
            Duration::from_secs(30),
            Some(tx),
        );

        assert_eq!(rx.recv().await, Some(AutosaveOutcome::Skipped));
        assert!(store.keys().is_empty());

        autosaver.update(fields("Draft title", ""));
        autosaver.update(fields("Draft title", "Newest body"));

        let outcome = rx.recv().await;
        assert!(matches!(outcome, Some(AutosaveOutcome::Saved(_))));
        let draft = manager.load(&ContentIdentity::New).expect("draft stored");
        assert_eq!(draft.fields.body, "Newest body");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_autosaver_stops_ticks() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let autosaver = Autosaver::spawn(
            manager,
            ContentIdentity::New,
            fields("Title", "Body"),
            Duration::from_secs(30),
            Some(tx),
        );
        drop(autosaver);

        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_autosaver_leaves_discarded_draft_gone() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let manager = manager_with(store.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let autosaver = Autosaver::spawn(
            manager.clone(),
            ContentIdentity::New,
            fields("Saved title", "Saved body"),
            Duration::from_secs(30),
            Some(tx),
        );

        autosaver.pause();
        assert!(autosaver.is_paused());
        manager.discard(&ContentIdentity::New);

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert!(rx.try_recv().is_err());
        assert!(store.keys().is_empty());

        autosaver.resume();
        let outcome = rx.recv().await;
        assert!(matches!(outcome, Some(AutosaveOutcome::Saved(_))));
        assert!(manager.load(&ContentIdentity::New).is_some());
    }
}
