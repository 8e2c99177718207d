//! Lead capture use case implementation.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    AnalyticsEvent, ContactRequest, LeadForm, LeadSubmission, NewsletterSignup,
};
use crate::domain::errors::RelayError;
use crate::domain::ports::{AnalyticsPort, FormRelayPort, RelayReceipt};
use crate::domain::services::{FieldError, validate_contact, validate_newsletter};

/// Analytics event recorded for every accepted submission.
pub const LEAD_SUBMITTED_EVENT: &str = "lead_submitted";

/// Why a lead was not submitted.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("{} field(s) invalid", .0.len())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Validates lead forms and hands them to the relay.
#[derive(Clone)]
pub struct SubmitLeadUseCase {
    relay: Arc<dyn FormRelayPort>,
    analytics: Arc<dyn AnalyticsPort>,
    session_id: String,
}

impl SubmitLeadUseCase {
    #[must_use]
    pub fn new(
        relay: Arc<dyn FormRelayPort>,
        analytics: Arc<dyn AnalyticsPort>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            relay,
            analytics,
            session_id: session_id.into(),
        }
    }

    /// # Errors
    /// Returns field errors, or the relay failure. Nothing is retried.
    pub async fn contact(&self, request: &ContactRequest) -> Result<RelayReceipt, LeadError> {
        validate_contact(request).map_err(LeadError::Invalid)?;
        self.submit(LeadSubmission::from(request)).await
    }

    /// # Errors
    /// Returns the email error, or the relay failure.
    pub async fn subscribe(&self, signup: &NewsletterSignup) -> Result<RelayReceipt, LeadError> {
        validate_newsletter(signup).map_err(LeadError::Invalid)?;
        self.submit(LeadSubmission::from(signup)).await
    }

    async fn submit(&self, submission: LeadSubmission) -> Result<RelayReceipt, LeadError> {
        debug!(form = %submission.form, "Relaying lead");
        let receipt = self.relay.submit(&submission).await?;
        info!(form = %receipt.form, "Lead submitted");

        let path = match submission.form {
            LeadForm::Contact => "/contact",
            LeadForm::Newsletter => "/newsletter",
        };
        let event = AnalyticsEvent::new(LEAD_SUBMITTED_EVENT, path, &self.session_id, Utc::now());
        if let Err(e) = self.analytics.record(&event).await {
            warn!(error = %e, "Failed to record lead analytics");
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockFormRelayPort;
    use crate::infrastructure::content::DemoAnalytics;

    fn contact() -> ContactRequest {
        ContactRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            message: "We would like to co-found a company.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_contact_is_relayed_once() {
        let mut relay = MockFormRelayPort::new();
        relay
            .expect_submit()
            .withf(|s| s.form == LeadForm::Contact && s.fields[0].1 == "Ada Lovelace")
            .times(1)
            .returning(|s| {
                Ok(RelayReceipt {
                    form: s.form,
                    accepted_at: Utc::now(),
                    reference: Some("abc".to_string()),
                })
            });

        let use_case = SubmitLeadUseCase::new(Arc::new(relay), Arc::new(DemoAnalytics), "s");
        let receipt = use_case.contact(&contact()).await.expect("relay accepts");
        assert_eq!(receipt.reference.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_relay() {
        let mut relay = MockFormRelayPort::new();
        relay.expect_submit().times(0);

        let use_case = SubmitLeadUseCase::new(Arc::new(relay), Arc::new(DemoAnalytics), "s");
        let err = use_case
            .subscribe(&NewsletterSignup {
                email: "not-an-email".to_string(),
            })
            .await
            .expect_err("invalid email");
        assert!(matches!(err, LeadError::Invalid(ref f) if f[0].field == "email"));
    }

    #[tokio::test]
    async fn test_relay_failure_is_not_retried() {
        let mut relay = MockFormRelayPort::new();
        relay
            .expect_submit()
            .times(1)
            .returning(|_| Err(RelayError::rejected(422, "spam")));

        let use_case = SubmitLeadUseCase::new(Arc::new(relay), Arc::new(DemoAnalytics), "s");
        let err = use_case.contact(&contact()).await.expect_err("rejected");
        assert!(matches!(err, LeadError::Relay(RelayError::Rejected { status: 422, .. })));
    }
}
