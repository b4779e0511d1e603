//! PayOS payment gateway adapter.
//!
//! Issues VietQR checkout links through the PayOS merchant API and
//! authenticates PayOS webhook deliveries.
//!
//! # Security
//!
//! - Client id, API key and checksum key are held as `SecretString`
//! - Webhooks are verified over the body exactly as received

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use crate::domain::billing::{
    ExternalOrderId, GatewayKind, PayOsSigner, PaymentEvent, PaymentRequestFields, WebhookError,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{GatewayError, PaymentGateway, PaymentLink, PaymentLinkRequest};

use super::types::{
    ApiResponse, CreatePaymentRequest, PaymentItem, PaymentLinkData, WebhookBody, SUCCESS_CODE,
};

const DEFAULT_API_BASE_URL: &str = "https://api-merchant.payos.vn";

/// PayOS API configuration.
#[derive(Clone)]
pub struct PayOsConfig {
    client_id: String,
    api_key: SecretString,
    checksum_key: SecretString,
    api_base_url: String,
    return_url: String,
    cancel_url: String,
    link_expiry_minutes: i64,
    timeout: Duration,
}

impl PayOsConfig {
    pub fn new(
        client_id: impl Into<String>,
        api_key: SecretString,
        checksum_key: SecretString,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_key,
            checksum_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            return_url: "app://birdlens/payment-success".to_string(),
            cancel_url: "app://birdlens/payment-cancel".to_string(),
            link_expiry_minutes: 15,
            timeout: Duration::from_secs(20),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_redirect_urls(mut self, return_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        self.return_url = return_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    pub fn with_link_expiry_minutes(mut self, minutes: i64) -> Self {
        self.link_expiry_minutes = minutes;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// PayOS implementation of [`PaymentGateway`].
pub struct PayOsGateway {
    config: PayOsConfig,
    signer: PayOsSigner,
    http_client: reqwest::Client,
}

impl PayOsGateway {
    pub fn new(config: PayOsConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            signer: PayOsSigner::new(config.checksum_key.clone()),
            config,
            http_client,
        })
    }

    fn build_request(&self, request: &PaymentLinkRequest, now: Timestamp) -> CreatePaymentRequest {
        let description = request.description();
        let signature = self.signer.sign_payment_request(&PaymentRequestFields {
            amount: request.amount,
            cancel_url: &self.config.cancel_url,
            description: &description,
            order_code: request.order_code,
            return_url: &self.config.return_url,
        });

        CreatePaymentRequest {
            order_code: request.order_code,
            amount: request.amount,
            description,
            buyer_name: request.buyer_name.clone(),
            buyer_email: request.buyer_email.clone(),
            buyer_phone: None,
            items: vec![PaymentItem {
                name: request.plan_name.clone(),
                quantity: 1,
                price: request.amount,
            }],
            cancel_url: self.config.cancel_url.clone(),
            return_url: self.config.return_url.clone(),
            expired_at: now
                .as_unix_secs()
                .saturating_add(self.config.link_expiry_minutes.saturating_mul(60)),
            signature,
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Maps a verified webhook body onto a ledger event.
fn event_from_body(body: WebhookBody) -> PaymentEvent {
    if body.code == SUCCESS_CODE {
        PaymentEvent::Paid {
            external_order_id: ExternalOrderId::from_order_code(body.data.order_code),
            amount: Some(body.data.amount),
        }
    } else {
        PaymentEvent::NotPaid {
            code: body.code,
            description: body.desc,
        }
    }
}

#[async_trait]
impl PaymentGateway for PayOsGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::PayOs
    }

    fn currency(&self) -> &str {
        "VND"
    }

    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, GatewayError> {
        let url = format!("{}/v2/payment-requests", self.config.api_base_url);
        let body = self.build_request(request, Timestamp::now());

        let response = self
            .http_client
            .post(&url)
            .header("x-client-id", &self.config.client_id)
            .header("x-api-key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                order_code = request.order_code,
                "PayOS rejected payment request"
            );
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ApiResponse<PaymentLinkData> = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        if parsed.code != SUCCESS_CODE {
            return Err(GatewayError::Rejected {
                code: parsed.code,
                description: parsed.desc,
            });
        }
        let data = parsed
            .data
            .ok_or_else(|| GatewayError::Malformed("response has no data".to_string()))?;
        if data.checkout_url.is_empty() {
            return Err(GatewayError::Malformed("empty checkoutUrl".to_string()));
        }

        Ok(PaymentLink {
            checkout_url: data.checkout_url,
            gateway_reference: data.payment_link_id,
        })
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        _signature_header: Option<&str>,
    ) -> Result<PaymentEvent, WebhookError> {
        let raw: Value =
            serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))?;

        self.signer.verify_webhook(&raw)?;

        let body: WebhookBody =
            serde_json::from_value(raw).map_err(|e| WebhookError::ParseError(e.to_string()))?;
        Ok(event_from_body(body))
    }
}

/// Builds a correctly signed webhook body, for tests and local tooling.
pub fn sign_webhook_body(checksum_key: &SecretString, code: &str, data: Value) -> Value {
    let signer = PayOsSigner::new(checksum_key.clone());
    let signature = data
        .as_object()
        .map(|map| signer.sign_data(map))
        .unwrap_or_default();
    serde_json::json!({
        "code": code,
        "desc": if code == SUCCESS_CODE { "success" } else { "failed" },
        "success": code == SUCCESS_CODE,
        "data": data,
        "signature": signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CHECKSUM: &str = "test_checksum_key";

    fn gateway() -> PayOsGateway {
        let config = PayOsConfig::new(
            "client-1",
            SecretString::new("api-key".to_string()),
            SecretString::new(CHECKSUM.to_string()),
        );
        PayOsGateway::new(config).unwrap()
    }

    fn key() -> SecretString {
        SecretString::new(CHECKSUM.to_string())
    }

    fn data(order_code: i64) -> Value {
        json!({
            "orderCode": order_code,
            "amount": 20000,
            "description": "ExBird",
            "accountNumber": "12345678",
            "reference": "TF230204212323",
            "transactionDateTime": "2023-02-04 18:25:00"
        })
    }

    fn link_request() -> PaymentLinkRequest {
        PaymentLinkRequest {
            order_code: 171234,
            external_order_id: ExternalOrderId::from_order_code(171234),
            amount: 20000,
            currency: "VND".to_string(),
            plan_name: "ExBird".to_string(),
            buyer_name: "Ana Tran".to_string(),
            buyer_email: "ana@example.com".to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Outbound Request
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn request_is_signed_over_the_five_fields() {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let body = gateway().build_request(&link_request(), now);

        assert_eq!(
            body.signature,
            "d2874731459ebaf5925f5b88829d3cbba44578b38d5773412d39491d935b69f3"
        );
        assert_eq!(body.expired_at, 1_700_000_000 + 15 * 60);
        assert_eq!(body.items[0].price, 20000);
    }

    // ══════════════════════════════════════════════════════════════
    // Webhook Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn successful_payment_maps_to_paid() {
        let body = sign_webhook_body(&key(), "00", data(171234));
        let event = gateway()
            .verify_webhook(body.to_string().as_bytes(), None)
            .unwrap();

        assert_eq!(
            event,
            PaymentEvent::Paid {
                external_order_id: ExternalOrderId::from_order_code(171234),
                amount: Some(20000),
            }
        );
    }

    #[test]
    fn non_success_code_maps_to_not_paid() {
        let body = sign_webhook_body(&key(), "01", data(171234));
        let event = gateway()
            .verify_webhook(body.to_string().as_bytes(), None)
            .unwrap();

        assert!(matches!(event, PaymentEvent::NotPaid { code, .. } if code == "01"));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let result = gateway().verify_webhook(b"{not json", None);
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn forged_signature_is_rejected_before_decoding() {
        let mut body = sign_webhook_body(&key(), "00", data(171234));
        body["signature"] = json!("0".repeat(64));
        let result = gateway().verify_webhook(body.to_string().as_bytes(), None);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn signed_but_incomplete_data_is_a_parse_error() {
        let body = sign_webhook_body(&key(), "00", json!({ "amount": 20000 }));
        let result = gateway().verify_webhook(body.to_string().as_bytes(), None);
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
