//! Payment gateway port.
//!
//! One implementation per processor. A gateway both issues checkout links and
//! authenticates its own webhook deliveries, since only it knows its
//! signature scheme.
//!
//! # Design
//!
//! - **Verification is synchronous**: it is pure CPU work over the raw body
//! - **Secrets stay inside**: `PaymentLink` carries only what the client may see

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::billing::{ExternalOrderId, GatewayKind, PaymentEvent, WebhookError};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    /// ISO currency orders on this gateway are charged in.
    fn currency(&self) -> &str;

    /// Calls the processor's "create payment" API.
    ///
    /// Implementations bound the call with a timeout and report it as
    /// `GatewayError::Timeout`.
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, GatewayError>;

    /// Authenticates a raw webhook body and maps it to a ledger event.
    ///
    /// Must be called on the exact bytes received, before any other parsing.
    fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<PaymentEvent, WebhookError>;
}

/// Everything a gateway needs to build its checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLinkRequest {
    pub order_code: i64,
    pub external_order_id: ExternalOrderId,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub plan_name: String,
    pub buyer_name: String,
    pub buyer_email: String,
}

impl PaymentLinkRequest {
    /// Human readable line shown on the gateway's checkout page.
    pub fn description(&self) -> String {
        format!("Birdlens {} Subscription for {}", self.plan_name, self.buyer_email)
    }
}

/// Result of a successful "create payment" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub checkout_url: String,
    /// Processor-side id (PayOS payment link id, Stripe session id).
    pub gateway_reference: Option<String>,
}

/// Errors from talking to a payment processor.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("gateway request timed out")]
    Timeout,

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// HTTP 200 but the processor refused the request.
    #[error("gateway rejected request: {code} {description}")]
    Rejected { code: String, description: String },

    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Timeout | GatewayError::Transport(_) => true,
            GatewayError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            GatewayError::Rejected { .. } | GatewayError::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_names_plan_and_buyer() {
        let request = PaymentLinkRequest {
            order_code: 1,
            external_order_id: ExternalOrderId::from_order_code(1),
            amount: 20000,
            currency: "VND".to_string(),
            plan_name: "ExBird".to_string(),
            buyer_name: "Ana Tran".to_string(),
            buyer_email: "ana@example.com".to_string(),
        };
        assert_eq!(request.description(), "Birdlens ExBird Subscription for ana@example.com");
    }

    #[test]
    fn server_side_failures_are_retryable() {
        assert!(GatewayError::Timeout.is_retryable());
        assert!(GatewayError::HttpStatus { status: 503, body: String::new() }.is_retryable());
        assert!(!GatewayError::HttpStatus { status: 401, body: String::new() }.is_retryable());
        assert!(!GatewayError::Malformed("no data".to_string()).is_retryable());
    }
}
