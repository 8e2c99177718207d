//! Domain types for progressive image display.
//!
//! Every displayed image owns an [`ImageSlot`], a small state machine:
//! `Pending -> Loading -> Loaded | Error`. A failed original source is retried
//! exactly once against a fallback picked from the image label, after which the
//! slot gives up.

use serde::{Deserialize, Serialize};

/// Caption shown when a failed image has no label.
pub const UNLABELLED_IMAGE_CAPTION: &str = "Image unavailable";

/// Unique identifier for an image source.
/// Generated from a hash of the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub String);

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an `ImageId` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which fallback family replaces a failed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    /// Portraits and team photos.
    Team,
    /// Blog and article covers.
    Blog,
    /// Everything else.
    Generic,
}

impl FallbackKind {
    /// Picks a fallback family from the image's accessible label.
    #[must_use]
    pub fn for_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::Generic;
        };
        let label = label.to_lowercase();

        if label.contains("team") || label.contains("author") {
            Self::Team
        } else if label.contains("blog") || label.contains("article") {
            Self::Blog
        } else {
            Self::Generic
        }
    }
}

impl std::fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Team => write!(f, "team"),
            Self::Blog => write!(f, "blog"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// Alternate sources used after an original image fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSources {
    pub team: String,
    pub blog: String,
    pub generic: String,
}

impl FallbackSources {
    /// Returns the source for a fallback family.
    #[must_use]
    pub fn url_for(&self, kind: FallbackKind) -> &str {
        match kind {
            FallbackKind::Team => &self.team,
            FallbackKind::Blog => &self.blog,
            FallbackKind::Generic => &self.generic,
        }
    }
}

/// Which source an attempt is fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The source the caller asked for.
    Original,
    /// The single heuristic substitute.
    Fallback(FallbackKind),
}

/// How a slot begins its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Wait for a visibility signal.
    #[default]
    Lazy,
    /// Start fetching immediately.
    Eager,
}

/// Load state of a single displayed image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageLoadState {
    /// Not visible yet, placeholder shown.
    #[default]
    Pending,
    /// A fetch is in flight.
    Loading(Attempt),
    /// Terminal success.
    Loaded {
        attempt: Attempt,
        width: u32,
        height: u32,
    },
    /// Terminal failure after the fallback also failed.
    Error,
}

impl ImageLoadState {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A fetch the slot wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation of the slot when the request was made.
    pub generation: u64,
    pub url: String,
    pub attempt: Attempt,
}

/// What the slot did with a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Result belonged to an older source or a finished slot.
    Ignored,
    /// Retry once against the fallback.
    Retry(FetchRequest),
    /// Both attempts failed.
    Failed,
}

/// Progressive loading state of one image element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    source: String,
    label: Option<String>,
    mode: LoadMode,
    state: ImageLoadState,
    current_url: String,
    generation: u64,
}

impl ImageSlot {
    /// Creates a slot for `source`.
    ///
    /// Eager slots start directly in `Loading`; lazy ones wait in `Pending`.
    #[must_use]
    pub fn new(source: impl Into<String>, label: Option<String>, mode: LoadMode) -> Self {
        let source = source.into();
        let state = match mode {
            LoadMode::Lazy => ImageLoadState::Pending,
            LoadMode::Eager => ImageLoadState::Loading(Attempt::Original),
        };
        Self {
            current_url: source.clone(),
            source,
            label,
            mode,
            state,
            generation: 0,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub const fn state(&self) -> &ImageLoadState {
        &self.state
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// URL of the attempt in flight, or of the last attempt made.
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Caption rendered in the error placeholder.
    #[must_use]
    pub fn caption(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(UNLABELLED_IMAGE_CAPTION)
    }

    /// The fetch matching the current `Loading` state, if any.
    #[must_use]
    pub fn current_request(&self) -> Option<FetchRequest> {
        match self.state {
            ImageLoadState::Loading(attempt) => Some(FetchRequest {
                generation: self.generation,
                url: self.current_url.clone(),
                attempt,
            }),
            _ => None,
        }
    }

    /// Visibility signal: moves a pending slot to `Loading`.
    ///
    /// Returns the fetch to issue, or `None` if the slot was not pending.
    pub fn reveal(&mut self) -> Option<FetchRequest> {
        if !self.state.is_pending() {
            return None;
        }
        self.current_url.clone_from(&self.source);
        self.state = ImageLoadState::Loading(Attempt::Original);
        self.current_request()
    }

    /// Applies a successful fetch. Returns false if the result was stale.
    pub fn complete(&mut self, generation: u64, width: u32, height: u32) -> bool {
        if generation != self.generation {
            return false;
        }
        let ImageLoadState::Loading(attempt) = self.state else {
            return false;
        };
        self.state = ImageLoadState::Loaded {
            attempt,
            width,
            height,
        };
        true
    }

    /// Applies a failed fetch and decides whether to fall back.
    pub fn fail(&mut self, generation: u64, fallbacks: &FallbackSources) -> FailureOutcome {
        if generation != self.generation {
            return FailureOutcome::Ignored;
        }
        match self.state {
            ImageLoadState::Loading(Attempt::Original) => {
                let kind = FallbackKind::for_label(self.label.as_deref());
                self.current_url = fallbacks.url_for(kind).to_string();
                self.state = ImageLoadState::Loading(Attempt::Fallback(kind));
                self.current_request()
                    .map_or(FailureOutcome::Failed, FailureOutcome::Retry)
            }
            ImageLoadState::Loading(Attempt::Fallback(_)) => {
                self.state = ImageLoadState::Error;
                FailureOutcome::Failed
            }
            _ => FailureOutcome::Ignored,
        }
    }

    /// Points the slot at a new source.
    ///
    /// A different source resets the slot to `Pending` (or `Loading` when
    /// eager) and invalidates any in-flight fetch. Returns true on reset.
    pub fn set_source(&mut self, source: impl Into<String>, label: Option<String>) -> bool {
        let source = source.into();
        self.label = label;
        if source == self.source {
            return false;
        }
        self.generation += 1;
        self.current_url.clone_from(&source);
        self.source = source;
        self.state = match self.mode {
            LoadMode::Lazy => ImageLoadState::Pending,
            LoadMode::Eager => ImageLoadState::Loading(Attempt::Original),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallbacks() -> FallbackSources {
        FallbackSources {
            team: "https://img.test/team.jpg".to_string(),
            blog: "https://img.test/blog.jpg".to_string(),
            generic: "https://img.test/generic.jpg".to_string(),
        }
    }

    #[test]
    fn test_image_id_from_url() {
        let id = ImageId::from_url("https://example.com/image.png");
        assert_eq!(id.as_str().len(), 32);
        assert_eq!(id, ImageId::from_url("https://example.com/image.png"));
    }

    #[test]
    fn test_fallback_kind_heuristic() {
        assert_eq!(FallbackKind::for_label(Some("Our Team at work")), FallbackKind::Team);
        assert_eq!(FallbackKind::for_label(Some("Author portrait")), FallbackKind::Team);
        assert_eq!(FallbackKind::for_label(Some("Blog cover")), FallbackKind::Blog);
        assert_eq!(FallbackKind::for_label(Some("ARTICLE hero")), FallbackKind::Blog);
        assert_eq!(FallbackKind::for_label(Some("Skyline")), FallbackKind::Generic);
        assert_eq!(FallbackKind::for_label(None), FallbackKind::Generic);
    }

    #[test]
    fn test_lazy_slot_waits_for_reveal() {
        let mut slot = ImageSlot::new("https://img.test/a.png", None, LoadMode::Lazy);
        assert!(slot.state().is_pending());
        assert!(slot.current_request().is_none());

        let request = slot.reveal().expect("pending slot should start loading");
        assert_eq!(request.url, "https://img.test/a.png");
        assert_eq!(request.attempt, Attempt::Original);
        assert!(slot.reveal().is_none());
    }

    #[test]
    fn test_eager_slot_starts_loading() {
        let slot = ImageSlot::new("https://img.test/a.png", None, LoadMode::Eager);
        assert!(slot.state().is_loading());
        assert!(slot.current_request().is_some());
    }

    #[test]
    fn test_team_label_falls_back_to_team_source() {
        let mut slot = ImageSlot::new(
            "https://img.test/broken.png",
            Some("Team photo".to_string()),
            LoadMode::Eager,
        );
        let outcome = slot.fail(0, &fallbacks());
        let FailureOutcome::Retry(request) = outcome else {
            panic!("expected a fallback retry, got {outcome:?}");
        };
        assert_eq!(request.url, "https://img.test/team.jpg");
        assert_eq!(request.attempt, Attempt::Fallback(FallbackKind::Team));
    }

    #[test]
    fn test_second_failure_is_terminal() {
        let mut slot = ImageSlot::new("https://img.test/broken.png", None, LoadMode::Eager);
        assert!(matches!(slot.fail(0, &fallbacks()), FailureOutcome::Retry(_)));
        assert_eq!(slot.fail(0, &fallbacks()), FailureOutcome::Failed);
        assert!(slot.state().is_error());
        assert_eq!(slot.fail(0, &fallbacks()), FailureOutcome::Ignored);
        assert!(slot.current_request().is_none());
        assert_eq!(slot.caption(), UNLABELLED_IMAGE_CAPTION);
    }

    #[test]
    fn test_success_after_fallback_records_attempt() {
        let mut slot = ImageSlot::new(
            "https://img.test/broken.png",
            Some("blog header".to_string()),
            LoadMode::Eager,
        );
        let _ = slot.fail(0, &fallbacks());
        assert!(slot.complete(0, 640, 480));
        assert_eq!(
            slot.state(),
            &ImageLoadState::Loaded {
                attempt: Attempt::Fallback(FallbackKind::Blog),
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_source_change_resets_and_drops_stale_results() {
        let mut slot = ImageSlot::new("https://img.test/a.png", None, LoadMode::Lazy);
        let old = slot.reveal().expect("request");

        assert!(slot.set_source("https://img.test/b.png", Some("cover".to_string())));
        assert!(slot.state().is_pending());
        assert_eq!(slot.caption(), "cover");

        assert!(!slot.complete(old.generation, 10, 10));
        assert_eq!(slot.fail(old.generation, &fallbacks()), FailureOutcome::Ignored);
        assert!(slot.state().is_pending());
    }

    #[test]
    fn test_same_source_does_not_reset() {
        let mut slot = ImageSlot::new("https://img.test/a.png", None, LoadMode::Eager);
        assert!(slot.complete(0, 1, 1));
        assert!(!slot.set_source("https://img.test/a.png", None));
        assert!(slot.state().is_loaded());
    }
}
