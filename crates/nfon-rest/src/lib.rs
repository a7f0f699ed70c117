//! NFON service portal REST API client.
//!
//! This crate sends signed requests to the portal API with:
//!
//! - **Endpoint table**: logical keys expanded from `{name}` path templates
//! - **Request signing**: fresh `Date`, `Content-MD5` and `NFON-API`
//!   authorization for every attempt
//! - **Bounded retry**: transport failures are retried, error statuses are not
//! - **Version check**: compares the server API version with the endpoint table
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use nfon_rest::NfonClient;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let client = NfonClient::new(credentials, "https://portal-api.example.net:8090")?;
//!
//! if !client.api_test().await?.is_up_to_date() {
//!     tracing::warn!("endpoint definitions are outdated");
//! }
//!
//! let response = client
//!     .get("customer", &[("identifier", client.user_id())])
//!     .await?;
//! println!("{}", response.text());
//! ```

mod client;
mod endpoints;
mod error;
mod responses;

pub use client::{NfonClient, NfonClientBuilder};
pub use endpoints::{EndpointTable, ENDPOINTS_VERSION, VERSION_ENDPOINT};
pub use error::NfonError;
pub use responses::{DataField, VersionCheck, VersionResponse};
pub use rest_client::{Method, RestResponse, RetryPolicy};
