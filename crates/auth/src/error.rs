use thiserror::Error;

/// Errors that can occur while preparing an authenticated request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The HMAC could not be keyed or computed.
    #[error("Failed to compute signature: {0}")]
    Signing(String),

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {0}")]
    BodySerialization(#[from] serde_json::Error),

    /// A header value contains bytes that cannot be sent on the wire.
    #[error("Invalid value for header {name}")]
    InvalidHeaderValue {
        /// Header name.
        name: &'static str,
    },
}
