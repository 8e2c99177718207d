//! Port for the third-party form relay.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{LeadForm, LeadSubmission};
use crate::domain::errors::RelayError;

/// Acknowledgement returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub form: LeadForm,
    pub accepted_at: DateTime<Utc>,
    /// Relay-side reference, when the endpoint returns one.
    pub reference: Option<String>,
}

/// Port for relaying named form fields.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRelayPort: Send + Sync {
    /// Posts a submission. No retry is attempted.
    async fn submit(&self, submission: &LeadSubmission) -> Result<RelayReceipt, RelayError>;
}
