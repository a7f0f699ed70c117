//! Transport abstraction and the raw request/response envelope.

use crate::error::RestError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// One outbound request, relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method.
    pub method: Method,
    /// Path appended verbatim to the base URL.
    pub path: String,
    /// Headers in send order.
    pub headers: Vec<(&'static str, String)>,
    /// Body bytes; `None` sends an empty payload.
    pub body: Option<Vec<u8>>,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl RestRequest {
    /// Request for `path` with no headers, body or timeout override.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Append a header.
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the body bytes.
    pub fn body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    /// Override the transport timeout for this request.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response, whatever its status.
#[derive(Debug, Clone)]
pub struct RestResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RestResponse {
    /// Wrap a received status, header map and body.
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RestError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::warn!(status = self.status, error = %e, "Failed to parse response");
            RestError::Parse(e.to_string())
        })
    }

    /// Turn a 4xx/5xx response into [`RestError::HttpError`].
    pub fn error_for_status(self) -> Result<Self, RestError> {
        if self.status >= 400 {
            Err(RestError::HttpError {
                status: self.status,
                message: self.text(),
            })
        } else {
            Ok(self)
        }
    }
}

/// Sends requests to a single base URL.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL requests are resolved against.
    fn base_url(&self) -> &str;

    /// Send one request. Only network level failures are errors; any
    /// received response is returned as-is.
    async fn send(&self, request: RestRequest) -> Result<RestResponse, RestError>;
}
