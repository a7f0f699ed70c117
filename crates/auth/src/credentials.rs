//! Secure API credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the API secret
//! and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the portal user id.
pub const USER_ID_VAR: &str = "NFON_USER_ID";
/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "NFON_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "NFON_API_SECRET";

/// API credentials for authenticated requests.
///
/// The user id is upper-cased on intake. The secret is wrapped in
/// `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ApiCredentials {
    user_id: String,
    api_key: String,
    api_secret: SecretString,
}

impl ApiCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `NFON_USER_ID` - Customer (`K...`) or system integrator (`S...`) id
    /// - `NFON_API_KEY` - The API key (public)
    /// - `NFON_API_SECRET` - The shared secret (private)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if any variable is not set.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let user_id = read_var(USER_ID_VAR)?;
        let api_key = read_var(API_KEY_VAR)?;
        let api_secret = read_var(API_SECRET_VAR)?;

        Ok(Self::new(user_id, api_key, api_secret))
    }

    /// Create credentials from explicit values.
    pub fn new(
        user_id: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into().to_uppercase(),
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Get the upper-cased user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get the API key (public, safe to log).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret for signing.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

fn read_var(name: &str) -> Result<String, AuthError> {
    std::env::var(name).map_err(|_| AuthError::MissingEnvVar(name.into()))
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("user_id", &self.user_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
