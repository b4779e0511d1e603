//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` port with one-off Checkout Sessions.
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`

mod stripe_gateway;
mod webhook_types;

pub use stripe_gateway::{StripeConfig, StripeGateway};
pub use webhook_types::{StripeCheckoutSession, StripeWebhookEvent};
