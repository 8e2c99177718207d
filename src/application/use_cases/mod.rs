//! Use case implementations.

mod delete_post_use_case;
mod save_post_use_case;
mod submit_lead_use_case;

pub use delete_post_use_case::DeletePostUseCase;
pub use save_post_use_case::{SavePostError, SavePostUseCase, SavedPost};
pub use submit_lead_use_case::{LEAD_SUBMITTED_EVENT, LeadError, SubmitLeadUseCase};
