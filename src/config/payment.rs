//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment configuration (PayOS, optionally Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub payos: PayOsSettings,

    /// Stripe is enabled only when this section is present
    #[serde(default)]
    pub stripe: Option<StripeSettings>,

    /// Upper bound for any "create payment" call
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,
}

/// PayOS merchant credentials and checkout settings
#[derive(Debug, Clone, Deserialize)]
pub struct PayOsSettings {
    pub client_id: String,
    pub api_key: SecretString,
    pub checksum_key: SecretString,

    #[serde(default = "default_payos_api_url")]
    pub api_url: String,

    #[serde(default = "default_return_url")]
    pub return_url: String,

    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    #[serde(default = "default_link_expiry")]
    pub link_expiry_minutes: i64,
}

/// Stripe credentials and checkout settings
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSettings {
    pub secret_key: SecretString,
    pub webhook_secret: SecretString,

    #[serde(default = "default_return_url")]
    pub success_url: String,

    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    #[serde(default = "default_stripe_currency")]
    pub currency: String,
}

impl PaymentConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gateway_timeout_secs == 0 || self.gateway_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        self.payos.validate()?;
        if let Some(stripe) = &self.stripe {
            stripe.validate()?;
        }
        Ok(())
    }
}

impl PayOsSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYOS_CLIENT_ID"));
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYOS_API_KEY"));
        }
        if self.checksum_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYOS_CHECKSUM_KEY"));
        }
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("payos api_url"));
        }
        if !(1..=24 * 60).contains(&self.link_expiry_minutes) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl StripeSettings {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_test_")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        // Verify key prefixes for safety
        if !self.secret_key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.webhook_secret.expose_secret().starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }
}

fn default_gateway_timeout() -> u64 {
    20
}

fn default_payos_api_url() -> String {
    "https://api-merchant.payos.vn".to_string()
}

fn default_return_url() -> String {
    "app://birdlens/payment-success".to_string()
}

fn default_cancel_url() -> String {
    "app://birdlens/payment-cancel".to_string()
}

fn default_link_expiry() -> i64 {
    15
}

fn default_stripe_currency() -> String {
    "EUR".to_string()
}
