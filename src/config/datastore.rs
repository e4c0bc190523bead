//! Hosted data store configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the hosted REST data store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatastoreSettings {
    /// Base URL of the data store API
    pub base_url: String,

    /// Service key used for authentication
    pub service_key: Secret<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries for failed source fetches
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl DatastoreSettings {
    /// Validate data store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidDatastoreUrl);
        }
        if self.service_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("datastore.service_key"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 10 {
            return Err(ValidationError::InvalidRetryPolicy);
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str, key: &str) -> DatastoreSettings {
        DatastoreSettings {
            base_url: base_url.to_string(),
            service_key: Secret::new(key.to_string()),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings("https://data.example.org", "key").validate().is_ok());
    }

    #[test]
    fn test_non_http_url_rejected() {
        assert!(settings("ftp://data.example.org", "key").validate().is_err());
    }

    #[test]
    fn test_blank_service_key_rejected() {
        assert!(settings("https://data.example.org", "  ").validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut s = settings("https://data.example.org", "key");
        s.timeout_secs = 0;
        assert!(s.validate().is_err());
    }
}
