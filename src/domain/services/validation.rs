//! Pre-save validation of posts and lead forms.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{ContactRequest, NewsletterSignup, PostFields};

pub const TITLE_MIN: usize = 10;
pub const TITLE_MAX: usize = 100;
pub const EXCERPT_MIN: usize = 50;
pub const EXCERPT_MAX: usize = 200;
pub const BODY_MIN: usize = 100;
pub const MAX_TAGS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// One message per violated post field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub tags: Option<String>,
}

impl ValidationErrors {
    /// Returns true if no field failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.excerpt.is_none()
            && self.body.is_none()
            && self.image.is_none()
            && self.tags.is_none()
    }

    /// Returns `(field, message)` pairs for every violation.
    #[must_use]
    pub fn messages(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", &self.title),
            ("excerpt", &self.excerpt),
            ("body", &self.body),
            ("image", &self.image),
            ("tags", &self.tags),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.as_deref().map(|m| (field, m)))
        .collect()
    }

    /// Number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages().len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .messages()
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn check_length(value: &str, label: &str, min: usize, max: Option<usize>) -> Option<String> {
    let length = char_len(value);
    if length == 0 {
        return Some(format!("{label} is required"));
    }
    if length < min {
        return Some(format!("{label} must be at least {min} characters"));
    }
    match max {
        Some(max) if length > max => Some(format!("{label} must be at most {max} characters")),
        _ => None,
    }
}

/// Returns true for a syntactically valid absolute URL.
#[must_use]
pub fn is_absolute_url(value: &str) -> bool {
    reqwest::Url::parse(value.trim()).is_ok_and(|url| url.has_host())
}

/// Returns true for a plausible email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Validates post fields before any save.
///
/// # Errors
/// Returns every violated field; no field is modified.
pub fn validate_post(fields: &PostFields) -> Result<(), ValidationErrors> {
    let image = if fields.image.trim().is_empty() {
        Some("Cover image URL is required".to_string())
    } else if is_absolute_url(&fields.image) {
        None
    } else {
        Some("Cover image must be a valid absolute URL".to_string())
    };

    let tags = if fields.tags.is_empty() {
        Some("At least one tag is required".to_string())
    } else if fields.tags.len() > MAX_TAGS {
        Some(format!("At most {MAX_TAGS} tags are allowed"))
    } else {
        None
    };

    let errors = ValidationErrors {
        title: check_length(&fields.title, "Title", TITLE_MIN, Some(TITLE_MAX)),
        excerpt: check_length(&fields.excerpt, "Excerpt", EXCERPT_MIN, Some(EXCERPT_MAX)),
        body: check_length(&fields.body, "Content", BODY_MIN, None),
        image,
        tags,
    };

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// A violated lead form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn email_error(email: &str) -> Option<FieldError> {
    if email.trim().is_empty() {
        Some(FieldError::new("email", "Email is required"))
    } else if is_valid_email(email) {
        None
    } else {
        Some(FieldError::new("email", "Please enter a valid email address"))
    }
}

/// Validates the contact form.
///
/// # Errors
/// Returns one entry per invalid field.
pub fn validate_contact(request: &ContactRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(message) = check_length(&request.name, "Name", 2, Some(100)) {
        errors.push(FieldError::new("name", message));
    }
    if let Some(error) = email_error(&request.email) {
        errors.push(error);
    }
    if let Some(company) = &request.company
        && char_len(company) > 100
    {
        errors.push(FieldError::new(
            "company",
            "Company must be at most 100 characters",
        ));
    }
    if let Some(message) = check_length(&request.message, "Message", 10, Some(2000)) {
        errors.push(FieldError::new("message", message));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validates the newsletter signup.
///
/// # Errors
/// Returns the email error.
pub fn validate_newsletter(signup: &NewsletterSignup) -> Result<(), Vec<FieldError>> {
    match email_error(&signup.email) {
        Some(error) => Err(vec![error]),
        None => Ok(()),
    }
}
