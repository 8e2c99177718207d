//! Pure domain services.

pub mod derived_fields;
pub mod validation;

pub use derived_fields::{auto_excerpt, estimate_read_time};
pub use validation::{
    FieldError, ValidationErrors, is_absolute_url, is_valid_email, validate_contact,
    validate_newsletter, validate_post,
};
