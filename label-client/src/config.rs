//! Client configuration

use std::time::Duration;

/// DYMO Connect printing service root on the local machine
pub const DEFAULT_BASE_URL: &str = "https://127.0.0.1:41951/DYMO/DLS/Printing";

/// Client configuration for connecting to DYMO Connect
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL, endpoint names are appended to it
    pub base_url: String,

    /// Timeout for listing and print requests in seconds
    pub timeout: u64,

    /// Timeout for the status check in seconds
    pub status_timeout: u64,

    /// Accept the self-signed certificate DYMO Connect serves on localhost
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 10,
            status_timeout: 5,
            accept_invalid_certs: true,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the status check timeout
    pub fn with_status_timeout(mut self, seconds: u64) -> Self {
        self.status_timeout = seconds;
        self
    }

    /// Require a valid certificate chain
    pub fn with_strict_tls(mut self) -> Self {
        self.accept_invalid_certs = false;
        self
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub(crate) fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout)
    }

    /// Create a DYMO Connect client from this configuration
    pub fn build_client(&self) -> crate::ClientResult<crate::DymoClient> {
        crate::DymoClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.status_timeout(), Duration::from_secs(5));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://localhost:9999")
            .with_timeout(3)
            .with_status_timeout(1)
            .with_strict_tls();
        assert_eq!(config.timeout, 3);
        assert_eq!(config.status_timeout, 1);
        assert!(!config.accept_invalid_certs);
    }
}
