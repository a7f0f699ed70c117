//! HMAC-SHA1 canonical-string signing for the NFON-API scheme.

use crate::credentials::ApiCredentials;
use crate::error::AuthError;
use crate::trace::{SigningTrace, TraceEvent};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "NFON-API";

/// The five request fields covered by the signature.
///
/// Built fresh for every attempt; the date is single use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningInput<'a> {
    /// HTTP method, e.g. `GET`.
    pub method: &'a str,
    /// Hex MD5 of the request body (MD5 of nothing when bodyless).
    pub content_md5: &'a str,
    /// Value of the `Content-Type` header.
    pub content_type: &'a str,
    /// Value of the `Date` header, verbatim.
    pub date: &'a str,
    /// Resolved request path, e.g. `/api/customers/K1234`.
    pub path: &'a str,
}

impl SigningInput<'_> {
    /// Build the string to sign.
    ///
    /// ```text
    /// Method + "\n" +
    /// Content-MD5 + "\n" +
    /// Content-Type + "\n" +
    /// Date + "\n" +
    /// Path
    /// ```
    ///
    /// The server rebuilds this string from the received request, so the
    /// order and the `\n` separators must be reproduced byte for byte.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}",
            self.method, self.content_md5, self.content_type, self.date, self.path
        )
    }
}

/// Request signer for authenticated NFON API calls.
pub struct RequestSigner<'a> {
    pub(crate) credentials: &'a ApiCredentials,
    pub(crate) trace: Option<&'a dyn SigningTrace>,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self {
            credentials,
            trace: None,
        }
    }

    /// Attach a trace hook that observes intermediate signing values.
    pub fn with_trace(mut self, trace: &'a dyn SigningTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Sign the canonical string of `input`.
    ///
    /// Returns `base64(HMAC-SHA1(secret, canonical_string))`.
    pub fn sign(&self, input: &SigningInput<'_>) -> Result<String, AuthError> {
        let canonical = input.canonical_string();
        self.emit(TraceEvent::CanonicalString(&canonical));
        self.sign_message(&canonical)
    }

    /// Sign an arbitrary message and return the base64-encoded signature.
    pub fn sign_message(&self, message: &str) -> Result<String, AuthError> {
        let mut mac = HmacSha1::new_from_slice(self.credentials.expose_secret().as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        mac.update(message.as_bytes());
        let result = mac.finalize();
        Ok(BASE64.encode(result.into_bytes()))
    }

    /// Format the `Authorization` header value for a signature.
    pub fn authorization(&self, signature: &str) -> String {
        format!(
            "{} {}:{}",
            AUTH_SCHEME,
            self.credentials.api_key(),
            signature
        )
    }

    pub(crate) fn emit(&self, event: TraceEvent<'_>) {
        if let Some(trace) = self.trace {
            trace.record(event);
        }
    }
}

impl std::fmt::Debug for RequestSigner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("credentials", self.credentials)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
