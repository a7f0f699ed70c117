//! HTTP transport infrastructure.
//!
//! This crate provides a thin layer over `reqwest` with:
//!
//! - A [`Transport`] trait so the dispatcher can run over any sender
//! - [`RestClient`], a connection-pooled transport bound to one base URL
//! - Raw [`RestResponse`]s: error statuses are data, not errors
//! - Bounded whole-request retry via [`RetryPolicy`]
//! - Consistent error handling via [`RestError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::{RestClient, RestRequest, Transport};
//! use reqwest::Method;
//!
//! let client = RestClient::with_default_timeout("https://portal-api.example.net")?;
//! let response = client.send(RestRequest::new(Method::GET, "/api/version")).await?;
//! println!("{} {}", response.status(), response.text());
//! ```

mod client;
mod error;
mod retry;
mod transport;

pub use client::RestClient;
pub use error::RestError;
pub use reqwest::Method;
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use transport::{RestRequest, RestResponse, Transport};
