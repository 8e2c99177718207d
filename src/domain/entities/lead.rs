//! Lead-capture form records.

use serde::{Deserialize, Serialize};

/// Identifies which relay form a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadForm {
    /// "Work with us" contact form.
    Contact,
    /// Newsletter signup in the footer.
    Newsletter,
}

impl std::fmt::Display for LeadForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact => write!(f, "contact"),
            Self::Newsletter => write!(f, "newsletter"),
        }
    }
}

/// Contact form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
}

/// Newsletter signup fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
}

/// A validated submission ready to relay as named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub form: LeadForm,
    pub fields: Vec<(String, String)>,
}

impl From<&ContactRequest> for LeadSubmission {
    fn from(request: &ContactRequest) -> Self {
        let mut fields = vec![
            ("name".to_string(), request.name.trim().to_string()),
            ("email".to_string(), request.email.trim().to_string()),
        ];
        if let Some(company) = request.company.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            fields.push(("company".to_string(), company.to_string()));
        }
        fields.push(("message".to_string(), request.message.trim().to_string()));
        Self {
            form: LeadForm::Contact,
            fields,
        }
    }
}

impl From<&NewsletterSignup> for LeadSubmission {
    fn from(signup: &NewsletterSignup) -> Self {
        Self {
            form: LeadForm::Newsletter,
            fields: vec![("email".to_string(), signup.email.trim().to_string())],
        }
    }
}
