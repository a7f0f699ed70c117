//! Shared plumbing for the NFON API crates.

mod backoff;
mod config;

pub use backoff::ExponentialBackoff;
pub use config::{
    ApiConfig, ClientConfig, ClientSettings, ConfigError, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_TIMEOUT_SECS,
};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
