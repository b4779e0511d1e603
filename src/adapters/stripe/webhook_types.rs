//! Stripe objects as they arrive in webhook payloads and API responses.

use serde::Deserialize;
use std::collections::HashMap;

/// Metadata key carrying our order code on sessions and payment intents.
pub const ORDER_CODE_METADATA_KEY: &str = "order_code";

// ════════════════════════════════════════════════════════════════════════════════
// Event Envelope
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Session
// ════════════════════════════════════════════════════════════════════════════════

/// Subset of the Checkout Session object this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page. Present on creation responses only.
    #[serde(default)]
    pub url: Option<String>,

    /// Set to our order code when the session is created.
    #[serde(default)]
    pub client_reference_id: Option<String>,

    /// `paid`, `unpaid` or `no_payment_required`.
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Total charged, minor units.
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeCheckoutSession {
    /// Our order code, from metadata or the client reference id.
    pub fn order_code(&self) -> Option<&str> {
        self.metadata
            .get(ORDER_CODE_METADATA_KEY)
            .map(String::as_str)
            .or(self.client_reference_id.as_deref())
            .filter(|code| !code.trim().is_empty())
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_code_prefers_metadata() {
        let session: StripeCheckoutSession = serde_json::from_str(
            r#"{"id":"cs_1","client_reference_id":"111","metadata":{"order_code":"222"}}"#,
        )
        .unwrap();
        assert_eq!(session.order_code(), Some("222"));
    }

    #[test]
    fn order_code_falls_back_to_client_reference() {
        let session: StripeCheckoutSession =
            serde_json::from_str(r#"{"id":"cs_1","client_reference_id":"111"}"#).unwrap();
        assert_eq!(session.order_code(), Some("111"));
    }

    #[test]
    fn event_envelope_parses() {
        let event: StripeWebhookEvent = serde_json::from_str(
            r#"{"id":"evt_1","type":"checkout.session.completed","created":1,"data":{"object":{"id":"cs_1"}}}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert!(!event.livemode);
    }
}
