//! Pooled `reqwest` transport.

use crate::error::RestError;
use crate::transport::{RestRequest, RestResponse, Transport};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP transport bound to one base URL, reusing connections across calls.
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "https://portal-api.example.net")
    /// * `timeout` - Default request timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new REST client with default timeout.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for RestClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: RestRequest) -> Result<RestResponse, RestError> {
        let url = self.build_url(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.client.request(request.method, &url);

        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status = status, bytes = body.len(), "Response received");

        Ok(RestResponse::new(status, headers, body))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
