//! Error types for provider and pipeline operations.
//!
//! This module defines [`FinError`], the single error taxonomy shared by every
//! provider client and tool pipeline.

use thiserror::Error;

/// Errors that can occur while resolving, fetching or validating financial data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinError {
    /// A ticker, CIK, series, SIC code or peer set has no resolvable data.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A provider requires a credential that was not configured.
    #[error("{provider} requires the {variable} environment variable")]
    MissingCredential {
        /// The provider that needs the credential.
        provider: String,
        /// The environment variable expected to carry it.
        variable: String,
    },

    /// A provider returned a non-success status, failed at the transport
    /// level, or sent a payload that could not be decoded.
    #[error("{provider} request failed: {message}")]
    Upstream {
        /// The provider that failed.
        provider: String,
        /// Description of the failure.
        message: String,
    },

    /// The caller supplied an invalid or incomplete argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FinError {
    /// Builds an [`FinError::Upstream`] for `provider`.
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Builds a [`FinError::MissingCredential`].
    pub fn missing_credential(provider: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
            variable: variable.into(),
        }
    }

    /// Returns true for [`FinError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using [`FinError`].
pub type Result<T> = std::result::Result<T, FinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = FinError::missing_credential("FRED", "FRED_API_KEY");
        assert_eq!(
            err.to_string(),
            "FRED requires the FRED_API_KEY environment variable"
        );

        let err = FinError::upstream("SEC EDGAR", "HTTP 503");
        assert_eq!(err.to_string(), "SEC EDGAR request failed: HTTP 503");
    }

    #[test]
    fn test_is_not_found() {
        assert!(FinError::NotFound("ZZZZ".into()).is_not_found());
        assert!(!FinError::InvalidArgument("limit".into()).is_not_found());
    }
}
