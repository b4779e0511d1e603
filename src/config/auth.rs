//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Access token validation settings (HS256)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,

    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,

    #[serde(default = "default_audience")]
    pub jwt_audience: String,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if environment == Environment::Production && secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.jwt_issuer.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_ISSUER"));
        }
        if self.jwt_audience.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_AUDIENCE"));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "birdlens".to_string()
}

fn default_audience() -> String {
    "birdlens-app".to_string()
}
