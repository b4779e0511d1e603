//! Stripe payment gateway adapter.
//!
//! Creates one-off Checkout Sessions for a plan and reconciles the
//! `checkout.session.*` webhook family.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::domain::billing::{
    ExternalOrderId, GatewayKind, PaymentEvent, StripeSignatureVerifier, WebhookError,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{GatewayError, PaymentGateway, PaymentLink, PaymentLinkRequest};

use super::webhook_types::{StripeCheckoutSession, StripeWebhookEvent, ORDER_CODE_METADATA_KEY};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    success_url: String,
    cancel_url: String,
    currency: String,
    timeout: Duration,

    /// Reject test-mode events.
    require_livemode: bool,
}

impl StripeConfig {
    pub fn new(api_key: SecretString, webhook_secret: SecretString) -> Self {
        Self {
            api_key,
            webhook_secret,
            api_base_url: "https://api.stripe.com".to_string(),
            success_url: "app://birdlens/payment-success".to_string(),
            cancel_url: "app://birdlens/payment-cancel".to_string(),
            currency: "EUR".to_string(),
            timeout: Duration::from_secs(20),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_redirect_urls(mut self, success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_ascii_uppercase();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Require livemode events in production.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe implementation of [`PaymentGateway`].
pub struct StripeGateway {
    config: StripeConfig,
    verifier: StripeSignatureVerifier,
    http_client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            verifier: StripeSignatureVerifier::new(config.webhook_secret.clone()),
            config,
            http_client,
        })
    }

    fn session_params(&self, request: &PaymentLinkRequest) -> Vec<(&'static str, String)> {
        let order_code = request.external_order_id.to_string();
        vec![
            ("mode", "payment".to_string()),
            ("customer_email", request.buyer_email.clone()),
            ("client_reference_id", order_code.clone()),
            ("metadata[order_code]", order_code.clone()),
            ("payment_intent_data[metadata][order_code]", order_code),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", request.currency.to_ascii_lowercase()),
            ("line_items[0][price_data][unit_amount]", request.amount.to_string()),
            ("line_items[0][price_data][product_data][name]", request.description()),
            ("success_url", self.config.success_url.clone()),
            ("cancel_url", self.config.cancel_url.clone()),
        ]
    }

    fn event_from(&self, event: StripeWebhookEvent) -> Result<PaymentEvent, WebhookError> {
        if self.config.require_livemode && !event.livemode {
            tracing::warn!(event_id = %event.id, "Rejected test mode event in production");
            return Ok(PaymentEvent::Ignored {
                event_type: format!("{} (test mode)", event.event_type),
            });
        }

        let kind = event.event_type.as_str();
        let relevant = matches!(
            kind,
            "checkout.session.completed"
                | "checkout.session.async_payment_succeeded"
                | "checkout.session.async_payment_failed"
                | "checkout.session.expired"
        );
        if !relevant {
            return Ok(PaymentEvent::Ignored {
                event_type: event.event_type,
            });
        }

        let session: StripeCheckoutSession = serde_json::from_value(event.data.object)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;
        let external_order_id = session
            .order_code()
            .ok_or(WebhookError::MissingField(ORDER_CODE_METADATA_KEY))
            .and_then(|code| {
                ExternalOrderId::new(code).map_err(|_| WebhookError::MissingField(ORDER_CODE_METADATA_KEY))
            })?;

        Ok(match kind {
            "checkout.session.completed" if !session.is_paid() => PaymentEvent::NotPaid {
                code: session.payment_status.unwrap_or_else(|| "unpaid".to_string()),
                description: "checkout completed, payment pending".to_string(),
            },
            "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
                PaymentEvent::Paid {
                    external_order_id,
                    amount: session.amount_total,
                }
            }
            "checkout.session.async_payment_failed" => PaymentEvent::Failed { external_order_id },
            _ => PaymentEvent::Cancelled { external_order_id },
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Stripe
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", format!("checkout-{}", request.external_order_id))
            .form(&self.session_params(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                order_code = %request.external_order_id,
                "Stripe rejected checkout session request"
            );
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let session: StripeCheckoutSession = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;
        let checkout_url = session
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GatewayError::Malformed("session has no url".to_string()))?;

        Ok(PaymentLink {
            checkout_url,
            gateway_reference: Some(session.id),
        })
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<PaymentEvent, WebhookError> {
        let header = signature_header.ok_or(WebhookError::InvalidSignature)?;
        self.verifier
            .verify(payload, header, Timestamp::now().as_unix_secs())?;

        let event: StripeWebhookEvent =
            serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))?;
        self.event_from(event)
    }
}
