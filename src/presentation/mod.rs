//! Presentation layer with UI components and event handling.

/// Event handling.
pub mod events;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::{App, install_panic_hook};
