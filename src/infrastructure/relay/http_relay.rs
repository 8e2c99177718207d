//! Posts lead forms to a hosted form relay.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::entities::{LeadForm, LeadSubmission};
use crate::domain::errors::RelayError;
use crate::domain::ports::{FormRelayPort, RelayReceipt};

#[derive(Debug, Default, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Relay client posting JSON to `{endpoint}/{form_id}`.
pub struct HttpFormRelay {
    client: Client,
    endpoint: Option<String>,
    contact_form_id: String,
    newsletter_form_id: String,
}

impl HttpFormRelay {
    /// Creates a relay client. `endpoint` of `None` yields a client that
    /// refuses every submission with [`RelayError::NotConfigured`].
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        endpoint: Option<String>,
        contact_form_id: impl Into<String>,
        newsletter_form_id: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| RelayError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint
                .map(|e| e.trim_end_matches('/').to_string())
                .filter(|e| !e.is_empty()),
            contact_form_id: contact_form_id.into(),
            newsletter_form_id: newsletter_form_id.into(),
        })
    }

    fn form_url(&self, form: LeadForm) -> Option<String> {
        let endpoint = self.endpoint.as_ref()?;
        let form_id = match form {
            LeadForm::Contact => &self.contact_form_id,
            LeadForm::Newsletter => &self.newsletter_form_id,
        };
        Some(format!("{endpoint}/{form_id}"))
    }
}

#[async_trait]
impl FormRelayPort for HttpFormRelay {
    async fn submit(&self, submission: &LeadSubmission) -> Result<RelayReceipt, RelayError> {
        let url = self
            .form_url(submission.form)
            .ok_or(RelayError::NotConfigured)?;

        let body: BTreeMap<&str, &str> = submission
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        debug!(form = %submission.form, "Submitting form to relay");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach form relay");
                if e.is_timeout() {
                    RelayError::network("request timed out")
                } else {
                    RelayError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let parsed: RelayResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let message = parsed.error.unwrap_or_else(|| format!("HTTP {status}"));
            return Err(match status {
                StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                    RelayError::network("form relay is temporarily unavailable")
                }
                _ => RelayError::rejected(status.as_u16(), message),
            });
        }

        info!(form = %submission.form, "Form accepted by relay");
        Ok(RelayReceipt {
            form: submission.form,
            accepted_at: Utc::now(),
            reference: parsed.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            form: LeadForm::Newsletter,
            fields: vec![("email".to_string(), "a@b.co".to_string())],
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_not_configured() {
        let relay = HttpFormRelay::new(None, "contact", "newsletter").expect("client builds");
        let err = relay.submit(&submission()).await.expect_err("no endpoint");
        assert!(matches!(err, RelayError::NotConfigured));
    }

    #[test]
    fn test_form_url_uses_form_id() {
        let relay = HttpFormRelay::new(
            Some("https://relay.example/f/".to_string()),
            "xcontact",
            "xnews",
        )
        .expect("client builds");
        assert_eq!(
            relay.form_url(LeadForm::Contact).as_deref(),
            Some("https://relay.example/f/xcontact")
        );
        assert_eq!(
            relay.form_url(LeadForm::Newsletter).as_deref(),
            Some("https://relay.example/f/xnews")
        );
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_network_error() {
        let relay = HttpFormRelay::new(Some("http://127.0.0.1:9".to_string()), "c", "n")
            .expect("client builds");
        let err = relay.submit(&submission()).await.expect_err("nothing listens");
        assert!(matches!(err, RelayError::Network { .. }));
    }
}
