//! HTTP client shared by the registry fetchers
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit and not-found mapping onto FetchError

use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("uptick/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FetchError::network_error("", "HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, FetchError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            debug!(url, attempt, "GET");
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(FetchError::rate_limit_exceeded(registry));
                        if attempt < self.max_retries {
                            warn!(registry, delay_ms = delay, "rate limited, retrying");
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(FetchError::package_not_found(package, registry));
                    }

                    if !status.is_success() {
                        return Err(FetchError::network_error(
                            package,
                            registry,
                            format!("HTTP {}", status),
                        ));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        FetchError::timeout(package, registry)
                    } else {
                        FetchError::network_error(package, registry, e.to_string())
                    });

                    if attempt < self.max_retries {
                        warn!(registry, package, error = %e, delay_ms = delay, "request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::network_error(package, registry, "unknown error")))
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, FetchError> {
        let response = self.get_with_context(url, package, registry).await?;
        response.json::<T>().await.map_err(|e| {
            FetchError::invalid_response(package, registry, format!("failed to parse JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn client() -> HttpClient {
        HttpClient::new().unwrap().with_max_retries(1)
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(60), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_max_retries() {
        let client = HttpClient::new().unwrap().with_max_retries(5);
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("uptick/"));
        assert_eq!(MAX_RETRIES, 3);
        assert_eq!(BASE_DELAY_MS, 100);
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pkg")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "pkg"}"#)
            .create_async()
            .await;

        let url = format!("{}/pkg", server.url());
        let payload: Payload = client().get_json(&url, "pkg", "test").await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload.name, "pkg");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_package_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let result: Result<Payload, _> = client().get_json(&url, "missing", "test").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap_err(), FetchError::package_not_found("missing", "test"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_then_reported() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/busy")
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let url = format!("{}/busy", server.url());
        let result: Result<Payload, _> = client().get_json(&url, "busy", "test").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap_err(), FetchError::rate_limit_exceeded("test"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let url = format!("{}/broken", server.url());
        let result: Result<Payload, _> = client().get_json(&url, "broken", "test").await;

        assert!(matches!(result, Err(FetchError::InvalidResponse { .. })));
    }
}
