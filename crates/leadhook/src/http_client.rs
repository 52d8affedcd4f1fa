use std::time::Duration;

use eyre::{Result, WrapErr};
use reqwest::{Client, ClientBuilder};

use crate::error::LeadhookError;

/// Request body size limit for inbound webhook payloads (256 KiB)
pub const MAX_REQUEST_SIZE: usize = 256 * 1024;

/// HTTP client factory with connection pooling and timeouts
pub struct HttpClientFactory {
    default_timeout: Duration,
    max_idle_per_host: usize,
}

impl HttpClientFactory {
    /// Create a new HTTP client factory with default settings
    pub fn new() -> Self {
        Self { default_timeout: Duration::from_secs(10), max_idle_per_host: 10 }
    }

    /// Create a new HTTP client with connection pooling
    pub fn create_client(&self) -> Result<Client> {
        ClientBuilder::new()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .timeout(self.default_timeout)
            .build()
            .wrap_err("Failed to create HTTP client")
    }

    /// Create a client with custom timeout
    pub fn create_client_with_timeout(&self, timeout: Duration) -> Result<Client> {
        ClientBuilder::new()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .timeout(timeout)
            .build()
            .wrap_err("Failed to create HTTP client with custom timeout")
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an outbound endpoint URL
///
/// # Errors
///
/// Returns an error if:
/// - The URL cannot be parsed
/// - The URL scheme is neither HTTP nor HTTPS
/// - The URL has no host
pub fn parse_endpoint_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url)
        .map_err(|e| LeadhookError::InvalidUrl(format!("Failed to parse URL '{url}': {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(
            LeadhookError::InvalidUrl(format!("URL '{url}' must use HTTP or HTTPS scheme")).into()
        );
    }

    if parsed.host_str().is_none() {
        return Err(LeadhookError::InvalidUrl(format!("URL '{url}' has no host")).into());
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_factory_creation() {
        let factory = HttpClientFactory::new();
        assert!(factory.create_client().is_ok());
    }

    #[test]
    fn test_client_with_custom_timeout() {
        let factory = HttpClientFactory::new();
        let client = factory.create_client_with_timeout(Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(parse_endpoint_url("https://script.google.com/macros/s/abc/exec").is_ok());
        assert!(parse_endpoint_url("https://graph.facebook.com/v17.0").is_ok());
        assert!(parse_endpoint_url("http://localhost:5000/webhook").is_ok());

        // Invalid URLs
        assert!(parse_endpoint_url("not-a-url").is_err());
        assert!(parse_endpoint_url("").is_err());
        assert!(parse_endpoint_url("ftp://example.com").is_err());
        assert!(parse_endpoint_url("https://").is_err());
    }
}
