//! Client configuration.

use url::Url;

use crate::error::ClientError;

/// Default API server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "HERBIVERSE_API_URL";
/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "HERBIVERSE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Herbiverse client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Herbiverse API server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
    }
}

impl ClientConfig {
    /// Defaults overridden by `HERBIVERSE_API_URL` / `HERBIVERSE_TIMEOUT_SECS`.
    ///
    /// An unparseable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.trim().parse() {
                Ok(secs) => config = config.with_timeout_secs(secs),
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", TIMEOUT_ENV, raw),
            }
        }
        config
    }

    /// Replace the request timeout. Zero is ignored with a warning.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        if secs == 0 {
            tracing::warn!("Ignoring zero request timeout; keeping {}s", self.timeout_secs);
        } else {
            self.timeout_secs = secs;
        }
        self
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse the base URL.
    pub(crate) fn parsed_base_url(&self) -> Result<Url, ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {:?}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("base URL {:?} cannot hold paths", self.base_url)));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_parsing() {
        assert!(ClientConfig::default().parsed_base_url().is_ok());
        assert!(ClientConfig::default().with_base_url("not a url").parsed_base_url().is_err());
        assert!(ClientConfig::default().with_base_url("mailto:a@b.com").parsed_base_url().is_err());
    }

    #[test]
    fn test_zero_timeout_keeps_previous() {
        assert_eq!(ClientConfig::default().with_timeout_secs(0).timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(ClientConfig::default().with_timeout_secs(5).timeout_secs, 5);
    }
}
