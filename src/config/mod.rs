//! Application configuration module
//!
//! Configuration is read from environment variables with the `BIRDLENS`
//! prefix; nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use birdlens_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod email;
mod error;
mod payment;
mod referral;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::{PayOsSettings, PaymentConfig, StripeSettings};
pub use referral::{ReferralConfig, WorkersConfig};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateways (PayOS, Stripe)
    pub payment: PaymentConfig,

    /// Access token validation
    pub auth: AuthConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub referral: ReferralConfig,

    #[serde(default)]
    pub workers: WorkersConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `BIRDLENS__*` variables.
    ///
    /// - `BIRDLENS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BIRDLENS__PAYMENT__PAYOS__CHECKSUM_KEY=...` -> `payment.payos.checksum_key`
    ///
    /// Values are kept as strings until deserialization so numeric-looking
    /// secrets survive intact.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BIRDLENS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        if self.server.request_timeout_secs <= self.payment.gateway_timeout_secs {
            return Err(ValidationError::InvalidTimeout);
        }
        self.auth.validate(self.server.environment)?;
        self.email.validate()?;
        self.referral.validate()?;
        self.workers.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL_ENV: &[(&str, &str)] = &[
        ("BIRDLENS__DATABASE__URL", "postgresql://test@localhost/birdlens"),
        ("BIRDLENS__PAYMENT__PAYOS__CLIENT_ID", "client-id"),
        ("BIRDLENS__PAYMENT__PAYOS__API_KEY", "api-key"),
        ("BIRDLENS__PAYMENT__PAYOS__CHECKSUM_KEY", "0123456789"),
        ("BIRDLENS__AUTH__JWT_SECRET", "development-secret"),
    ];

    const OPTIONAL_ENV: &[&str] = &[
        "BIRDLENS__SERVER__PORT",
        "BIRDLENS__SERVER__ENVIRONMENT",
        "BIRDLENS__PAYMENT__STRIPE__SECRET_KEY",
        "BIRDLENS__PAYMENT__STRIPE__WEBHOOK_SECRET",
        "BIRDLENS__REFERRAL__REWARD_PLAN",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL_ENV {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL_ENV {
            env::remove_var(key);
        }
        for key in OPTIONAL_ENV {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/birdlens");
        assert_eq!(config.payment.payos.client_id, "client-id");
        assert!(config.payment.stripe.is_none());
        assert_eq!(config.referral.reward_plan, "ExBird");
        assert_eq!(config.workers.count, 4);
    }

    #[test]
    fn numeric_looking_secret_is_kept_verbatim() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.payment.payos.checksum_key.expose_secret(), "0123456789");
    }

    #[test]
    fn test_validate_full_config() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_custom_server_port() {
        let config = load_with(&[("BIRDLENS__SERVER__PORT", "3000")]).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn stripe_section_enables_stripe() {
        let config = load_with(&[
            ("BIRDLENS__PAYMENT__STRIPE__SECRET_KEY", "sk_test_abc"),
            ("BIRDLENS__PAYMENT__STRIPE__WEBHOOK_SECRET", "whsec_abc"),
        ])
        .unwrap();
        let stripe = config.payment.stripe.as_ref().expect("stripe configured");
        assert!(stripe.is_test_mode());
        assert_eq!(stripe.currency, "EUR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_rejects_weak_jwt_secret() {
        let config = load_with(&[("BIRDLENS__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::WeakJwtSecret));
    }

    #[test]
    fn missing_payos_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("BIRDLENS__DATABASE__URL", "postgresql://test@localhost/birdlens");
        env::set_var("BIRDLENS__AUTH__JWT_SECRET", "development-secret");
        let result = AppConfig::load();
        clear_env();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
