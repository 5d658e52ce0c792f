//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Status and timeout mapping to RegistryError
//!
//! Requests are never retried; a failed refresh is reported and the stale
//! cache (if any) is used instead.

use crate::error::RegistryError;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("helm-outdated/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    ///
    /// `repository` only names the source in errors.
    pub async fn get_text(&self, url: &str, repository: &str) -> Result<String, RegistryError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::Timeout {
                    repository: repository.to_string(),
                }
            } else {
                RegistryError::network_error(repository, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::network_error(repository, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| RegistryError::invalid_response(repository, format!("failed to read body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(60), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("helm-outdated/"));
    }

    #[tokio::test]
    async fn test_get_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("apiVersion: v1\n"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let body = client
            .get_text(&format!("{}/index.yaml", server.uri()), "test")
            .await
            .unwrap();
        assert_eq!(body, "apiVersion: v1\n");
    }

    #[tokio::test]
    async fn test_get_text_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_text(&format!("{}/index.yaml", server.uri()), "test")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NetworkError { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_get_text_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = HttpClient::with_config(Duration::from_millis(100), "test-agent/1.0").unwrap();
        let err = client
            .get_text(&format!("{}/index.yaml", server.uri()), "slow")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Timeout { .. }));
    }
}
