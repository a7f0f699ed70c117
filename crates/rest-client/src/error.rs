//! REST client error types.

use thiserror::Error;

/// Errors that can occur during REST API calls.
#[derive(Debug, Error)]
pub enum RestError {
    /// HTTP error status, raised only by
    /// [`RestResponse::error_for_status`](crate::RestResponse::error_for_status).
    #[error("HTTP error: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection error (network issue).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to parse response body as JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// Failed to build the HTTP request.
    #[error("Request build error: {0}")]
    RequestBuild(String),
}

impl RestError {
    /// Check if this error is a transport failure worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RestError::Timeout | RestError::Connection(_))
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::Timeout
        } else if err.is_builder() {
            RestError::RequestBuild(err.to_string())
        } else if err.is_decode() {
            RestError::Parse(err.to_string())
        } else {
            RestError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failures_are_retryable() {
        assert!(RestError::Timeout.is_retryable());
        assert!(RestError::Connection("refused".into()).is_retryable());
    }

    #[test]
    fn test_other_errors_are_not_retryable() {
        assert!(!RestError::RequestBuild("bad header".into()).is_retryable());
        assert!(!RestError::Parse("eof".into()).is_retryable());
        assert!(!RestError::HttpError {
            status: 503,
            message: String::new()
        }
        .is_retryable());
    }
}
