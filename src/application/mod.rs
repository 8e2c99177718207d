//! Application layer with services and use cases.

/// Shared session context.
pub mod context;
/// Stateful services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use context::{AppContext, InitError};
pub use use_cases::{DeletePostUseCase, SavePostUseCase, SubmitLeadUseCase};
