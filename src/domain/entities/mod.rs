//! Domain entity definitions.

mod analytics;
mod diagnostics;
mod draft;
mod image;
mod lead;
mod post;

pub use analytics::{AnalyticsEvent, AnalyticsSummary, PageViews};
pub use diagnostics::{ErrorLogEntry, PerformanceEntry};
pub use draft::{DRAFT_KEY_PREFIX, Draft};
pub use image::{
    Attempt, FailureOutcome, FallbackKind, FallbackSources, FetchRequest, ImageId, ImageLoadState,
    ImageSlot, LoadMode, UNLABELLED_IMAGE_CAPTION,
};
pub use lead::{ContactRequest, LeadForm, LeadSubmission, NewsletterSignup};
pub use post::{BlogPost, ContentIdentity, PostFields, PostId, parse_tags};
