//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("gradle-assist/", env!("CARGO_PKG_VERSION"));

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

    /// Perform a GET request with retry logic
    ///
    /// Rate limiting, timeouts and connection failures are retried with
    /// exponential backoff; other HTTP errors fail immediately.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(url, attempt, delay_ms = delay, "retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }

            match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    StatusCode::TOO_MANY_REQUESTS => {
                        last_error = Some(RegistryError::rate_limit_exceeded(url));
                    }
                    StatusCode::NOT_FOUND => {
                        return Err(RegistryError::NotFound {
                            feed: url.to_string(),
                        });
                    }
                    status if !status.is_success() => {
                        return Err(RegistryError::network_error(url, format!("HTTP {}", status)));
                    }
                    _ => return Ok(response),
                },
                Err(e) if e.is_timeout() => {
                    last_error = Some(RegistryError::timeout(url));
                }
                Err(e) => {
                    last_error = Some(RegistryError::network_error(url, e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RegistryError::network_error(url, "unknown error")))
    }

    /// Perform a GET request and parse the JSON response
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::invalid_response(url, format!("failed to read body: {}", e)))?;
        serde_json::from_str(&body)
            .map_err(|e| RegistryError::invalid_response(url, format!("failed to parse JSON: {}", e)))
    }
}
