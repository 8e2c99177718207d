//! Studio Press - a terminal blog authoring tool.
//!
//! Posts are edited in a TUI with periodic draft autosave and recovery,
//! derived read time and excerpt, progressive cover image loading with a
//! single fallback, and lead capture through a form relay.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and the session context.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for storage and remote services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "studio-press";
