//! PayOS request signing and webhook verification.
//!
//! Outbound payment requests sign a fixed five-field string. Inbound webhooks
//! sign the `data` object: keys sorted lexicographically, joined as `k=v`
//! with `&`. Both use HMAC-SHA256 under the checksum key, hex encoded.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use super::signing::{constant_time_compare, hmac_sha256_hex};
use super::WebhookError;

/// Fields covered by the payment-request signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequestFields<'a> {
    pub amount: i64,
    pub cancel_url: &'a str,
    pub description: &'a str,
    pub order_code: i64,
    pub return_url: &'a str,
}

impl PaymentRequestFields<'_> {
    /// The exact string PayOS expects, fields in this order.
    pub fn canonical(&self) -> String {
        format!(
            "amount={}&cancelUrl={}&description={}&orderCode={}&returnUrl={}",
            self.amount, self.cancel_url, self.description, self.order_code, self.return_url
        )
    }
}

/// Renders one `data` value the way PayOS does when signing.
///
/// Numbers are rendered as integers (fractional parts truncated), null as the
/// empty string, nested values as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64()
                    .map(|f| (f.trunc() as i64).to_string())
                    .unwrap_or_default()
            }
        }
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

/// Sorted `k=v&k=v` form of a webhook `data` object.
pub fn canonical_data(data: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = data.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{}={}", key, render_value(&data[key.as_str()])))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs and verifies PayOS payloads.
pub struct PayOsSigner {
    checksum_key: SecretString,
}

impl PayOsSigner {
    pub fn new(checksum_key: SecretString) -> Self {
        Self { checksum_key }
    }

    fn key(&self) -> &[u8] {
        self.checksum_key.expose_secret().as_bytes()
    }

    /// Signature for the outbound "create payment link" body.
    pub fn sign_payment_request(&self, fields: &PaymentRequestFields<'_>) -> String {
        hmac_sha256_hex(self.key(), fields.canonical().as_bytes())
    }

    /// Signature over a webhook `data` object.
    pub fn sign_data(&self, data: &Map<String, Value>) -> String {
        hmac_sha256_hex(self.key(), canonical_data(data).as_bytes())
    }

    /// Verifies a webhook body that was parsed straight from the raw bytes.
    ///
    /// Missing `data`, a non-object `data` or a missing `signature` cannot be
    /// authenticated and are reported as `InvalidSignature`.
    pub fn verify_webhook(&self, body: &Value) -> Result<(), WebhookError> {
        let data = body
            .get("data")
            .and_then(Value::as_object)
            .ok_or(WebhookError::InvalidSignature)?;
        let provided = body
            .get("signature")
            .and_then(Value::as_str)
            .ok_or(WebhookError::InvalidSignature)?;

        let expected = self.sign_data(data);
        if !constant_time_compare(expected.as_bytes(), provided.trim().to_ascii_lowercase().as_bytes()) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }
}
