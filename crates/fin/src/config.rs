//! Service configuration.

use std::fmt;
use std::time::Duration;

use fin_core::{FinError, MIN_RATE, Result};

/// Request pacing and timeout for one provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProviderSettings {
    /// Requests per second.
    pub rate: f64,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl ProviderSettings {
    /// Create settings with an explicit rate and timeout.
    #[must_use]
    pub const fn new(rate: f64, timeout: Duration) -> Self {
        Self { rate, timeout }
    }

    fn validate(&self, provider: &str) -> Result<()> {
        if !self.rate.is_finite() || self.rate < MIN_RATE {
            return Err(FinError::InvalidArgument(format!(
                "{provider} rate must be at least {MIN_RATE} requests per second, got {}",
                self.rate
            )));
        }
        if self.timeout.is_zero() {
            return Err(FinError::InvalidArgument(format!(
                "{provider} timeout must be non-zero"
            )));
        }
        Ok(())
    }
}

/// Configuration for [`FinancialIntelligence`](crate::FinancialIntelligence).
///
/// EDGAR requires an identification string (`Name/Version (contact)`) on every
/// request. The FRED API key is optional here: without one, FRED calls fail
/// with [`FinError::MissingCredential`] while every other pipeline works.
#[derive(Clone, PartialEq)]
pub struct FinConfig {
    /// `User-Agent` sent to SEC EDGAR.
    pub edgar_user_agent: String,
    /// FRED API key.
    pub fred_api_key: Option<String>,
    /// SEC EDGAR pacing (10/s, 30s timeout by default).
    pub edgar: ProviderSettings,
    /// FRED pacing (2/s, 15s timeout by default).
    pub fred: ProviderSettings,
    /// Yahoo Finance pacing (0.1/s, 15s timeout by default).
    pub yahoo: ProviderSettings,
}

impl fmt::Debug for FinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinConfig")
            .field("edgar_user_agent", &self.edgar_user_agent)
            .field("fred_api_key", &self.fred_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("edgar", &self.edgar)
            .field("fred", &self.fred)
            .field("yahoo", &self.yahoo)
            .finish()
    }
}

impl FinConfig {
    /// Configuration with default pacing and no FRED key.
    #[must_use]
    pub fn new(edgar_user_agent: impl Into<String>) -> Self {
        Self {
            edgar_user_agent: edgar_user_agent.into(),
            fred_api_key: None,
            edgar: ProviderSettings::new(fin_edgar::DEFAULT_RATE, fin_edgar::DEFAULT_TIMEOUT),
            fred: ProviderSettings::new(fin_fred::DEFAULT_RATE, fin_fred::DEFAULT_TIMEOUT),
            yahoo: ProviderSettings::new(fin_yahoo::DEFAULT_RATE, fin_yahoo::DEFAULT_TIMEOUT),
        }
    }

    /// Set the FRED API key. Blank keys count as absent.
    #[must_use]
    pub fn with_fred_api_key(mut self, key: Option<String>) -> Self {
        self.fred_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Override the EDGAR request rate.
    #[must_use]
    pub const fn with_edgar_rate(mut self, rate: f64) -> Self {
        self.edgar.rate = rate;
        self
    }

    /// Override the FRED request rate.
    #[must_use]
    pub const fn with_fred_rate(mut self, rate: f64) -> Self {
        self.fred.rate = rate;
        self
    }

    /// Override the Yahoo request rate.
    #[must_use]
    pub const fn with_yahoo_rate(mut self, rate: f64) -> Self {
        self.yahoo.rate = rate;
        self
    }

    /// Checks the identification string and every provider's pacing.
    pub fn validate(&self) -> Result<()> {
        if self.edgar_user_agent.trim().is_empty() {
            return Err(FinError::InvalidArgument(
                "an EDGAR user agent (e.g. \"MyApp/1.0 (me@example.com)\") is required".to_string(),
            ));
        }
        self.edgar.validate("EDGAR")?;
        self.fred.validate("FRED")?;
        self.yahoo.validate("Yahoo")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FinConfig::new("Test/1.0 (test@example.com)");
        assert_eq!(config.edgar.rate, 10.0);
        assert_eq!(config.edgar.timeout, Duration::from_secs(30));
        assert_eq!(config.fred.rate, 2.0);
        assert_eq!(config.yahoo.rate, 0.1);
        assert_eq!(config.yahoo.timeout, Duration::from_secs(15));
        assert!(config.fred_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let err = FinConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, FinError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let config = FinConfig::new("Test/1.0").with_fred_rate(0.0);
        assert!(config.validate().is_err());

        let config = FinConfig::new("Test/1.0").with_yahoo_rate(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_below_one_per_day_rejected() {
        let config = FinConfig::new("Test/1.0").with_yahoo_rate(1e-20);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Yahoo rate must be at least"));

        let config = FinConfig::new("Test/1.0").with_yahoo_rate(MIN_RATE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_fred_key_is_absent() {
        let config = FinConfig::new("Test/1.0").with_fred_api_key(Some(" ".into()));
        assert!(config.fred_api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = FinConfig::new("Test/1.0").with_fred_api_key(Some("secret".into()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
