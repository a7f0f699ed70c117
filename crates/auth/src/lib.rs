//! Authentication and signing for the NFON service portal API.
//!
//! This crate provides secure credential management and the `NFON-API`
//! request signature.
//!
//! # Features
//!
//! - **Secure Credentials**: The API secret is wrapped in `SecretString` to
//!   prevent accidental logging and ensure memory is zeroed on drop.
//! - **HMAC-SHA1 Signing**: base64 HMAC over a newline-joined canonical string
//!   of method, content MD5, content type, date and path.
//! - **Header Builder**: produces `Authorization`, `Date`, `Host`,
//!   `Content-MD5` and `Content-Type` for one request.
//! - **Trace Hook**: optional observer of intermediate values.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{encode_json_body, ApiCredentials, RequestSigner};
//!
//! let credentials = ApiCredentials::from_env()?;
//! let signer = RequestSigner::new(&credentials);
//!
//! let body = encode_json_body(&serde_json::json!({"displayName": "Reception"}))?;
//! let headers = signer.build_headers(
//!     "POST",
//!     "/api/customers/K1234/targets/phone-extensions",
//!     Some(&body),
//!     "application/json",
//!     "portal-api.example.net",
//! )?;
//! ```

mod credentials;
mod date;
mod digest;
mod error;
mod headers;
mod signer;
mod trace;

pub use credentials::{ApiCredentials, API_KEY_VAR, API_SECRET_VAR, USER_ID_VAR};
pub use date::{http_date, HTTP_DATE_FORMAT};
pub use digest::{content_md5, encode_json_body, EMPTY_CONTENT_MD5};
pub use error::AuthError;
pub use headers::{host_from_base_url, SignedHeaders, DEFAULT_CONTENT_TYPE};
pub use signer::{RequestSigner, SigningInput, AUTH_SCHEME};
pub use trace::{SigningTrace, TraceEvent, TracingHook};
