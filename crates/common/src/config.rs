//! Client configuration from a TOML file or the environment.
//!
//! ```toml
//! [api]
//! base_url = "https://portal-api.example.net:8090"
//! user_id = "K1234"
//! key = "..."
//! secret = "..."
//!
//! [client]
//! timeout_secs = 10
//! max_attempts = 3
//! retry_backoff_ms = 250
//! trace = false
//! ```

use crate::backoff::ExponentialBackoff;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of attempts per request (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Upper bound for the retry delay derived from `retry_backoff_ms`.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Connection and credential settings for the portal API.
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including scheme, e.g. `https://portal-api.example.net:8090`.
    pub base_url: String,
    /// Customer (`K...`) or system integrator (`S...`) id.
    pub user_id: String,
    /// Public API key.
    pub key: String,
    /// Shared secret used for signing.
    pub secret: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Request tuning.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// Base delay between attempts; absent means retry immediately.
    pub retry_backoff_ms: Option<u64>,
    /// Emit intermediate signing values at TRACE level.
    pub trace: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: None,
            trace: false,
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub client: ClientSettings,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading config file");
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `NFON_BASE_URL`, `NFON_USER_ID`, `NFON_API_KEY`,
    /// `NFON_API_SECRET` and optionally `NFON_TIMEOUT_SECS`, after loading
    /// a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "Loaded .env file");
        }

        let api = ApiConfig {
            base_url: env_var("NFON_BASE_URL")?,
            user_id: env_var("NFON_USER_ID")?,
            key: env_var("NFON_API_KEY")?,
            secret: env_var("NFON_API_SECRET")?,
        };

        let mut client = ClientSettings::default();
        if let Ok(raw) = std::env::var("NFON_TIMEOUT_SECS") {
            client.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "NFON_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
        }

        let config = Self { api, client };
        config.validate()?;
        Ok(config)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Backoff between attempts, if configured.
    pub fn backoff(&self) -> Option<ExponentialBackoff> {
        self.client.retry_backoff_ms.map(|ms| {
            ExponentialBackoff::new(Duration::from_millis(ms), MAX_RETRY_DELAY, 0.1)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                name: "base_url",
                value: url.clone(),
            });
        }
        if self.client.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_attempts",
                value: "0".into(),
            });
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
[api]
base_url = "https://portal-api.example.net:8090"
user_id = "k1234"
key = "public-key"
secret = "shared-secret"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ClientConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.api.base_url, "https://portal-api.example.net:8090");
        assert_eq!(config.api.user_id, "k1234");
        assert_eq!(config.client, ClientSettings::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.backoff().is_none());
    }

    #[test]
    fn test_client_section_overrides() {
        let raw = format!(
            "{MINIMAL}\n[client]\ntimeout_secs = 30\nmax_attempts = 5\nretry_backoff_ms = 200\ntrace = true\n"
        );
        let config = ClientConfig::from_toml_str(&raw).unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.client.max_attempts, 5);
        assert!(config.client.trace);
        assert!(config.backoff().is_some());
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let raw = MINIMAL.replace("https://", "");
        let err = ClientConfig::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "base_url", .. }));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let raw = format!("{MINIMAL}\n[client]\nmax_attempts = 0\n");
        let err = ClientConfig::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "max_attempts", .. }));
    }

    #[test]
    fn test_missing_api_section() {
        let err = ClientConfig::from_toml_str("[client]\ntrace = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.key, "public-key");
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/nonexistent/nfon.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::from_toml_str(MINIMAL).unwrap();
        let debug_str = format!("{:?}", config);

        assert!(!debug_str.contains("shared-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
