//! Application services.

pub mod content_service;
pub mod diagnostics;
pub mod draft_manager;
pub mod editor_session;
pub mod image_coordinator;

pub use content_service::{ContentService, Sourced};
pub use diagnostics::{ErrorReporter, MAX_ERROR_LOGS, MAX_PERFORMANCE_ENTRIES, PerformanceRecorder};
pub use draft_manager::{AutosaveOutcome, Autosaver, DEFAULT_AUTOSAVE_INTERVAL, DraftManager};
pub use editor_session::{EditorField, EditorSession};
pub use image_coordinator::{ImageEvent, ImageLoadCoordinator, LOOKAHEAD_ROWS};
