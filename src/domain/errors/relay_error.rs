//! Form relay error types.

use thiserror::Error;

/// Failures submitting a form to the relay endpoint.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RelayError {
    #[error("form relay is not configured")]
    NotConfigured,

    #[error("network error submitting form: {message}")]
    Network { message: String },

    #[error("form relay rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl RelayError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates rejected error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
