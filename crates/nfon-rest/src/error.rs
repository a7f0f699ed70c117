//! NFON API client error types.

use auth::AuthError;
use rest_client::RestError;
use thiserror::Error;

/// Errors that can occur when calling the NFON API.
#[derive(Debug, Error)]
pub enum NfonError {
    /// The logical endpoint key is not in the endpoint table.
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(String),

    /// A placeholder of the endpoint template has no value.
    #[error(
        "Missing variable: {missing}. Required variables: {required:?}. Endpoint: {template} ({key})"
    )]
    MissingEndpointVariable {
        /// Endpoint key.
        key: String,
        /// First placeholder without a value.
        missing: String,
        /// Every placeholder the template requires, in order.
        required: Vec<String>,
        /// The unexpanded template.
        template: String,
    },

    /// The endpoint template itself is malformed.
    #[error("Invalid endpoint template {key} ({template}): {reason}")]
    InvalidEndpointTemplate {
        /// Endpoint key.
        key: String,
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Body serialization, hashing or signing failed.
    #[error("Failed to sign request: {0}")]
    SigningFailure(#[from] AuthError),

    /// Network failure or timeout, after all attempts.
    #[error("Transport error after {attempts} attempt(s): {source}")]
    Transport {
        /// Attempts made, including the failing one.
        attempts: u32,
        /// The last transport error.
        #[source]
        source: RestError,
    },

    /// A response carried an error status and the caller asked to enforce it.
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The base URL has no `http://` or `https://` scheme.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] RestError),

    /// A response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl NfonError {
    /// Check if another attempt of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map errors raised while inspecting a received response.
    pub(crate) fn from_response(err: RestError) -> Self {
        match err {
            RestError::HttpError { status, message } => Self::HttpStatus {
                status,
                body: message,
            },
            other => Self::Parse(other.to_string()),
        }
    }
}
