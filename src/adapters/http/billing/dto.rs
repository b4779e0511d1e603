//! HTTP DTOs for payment and subscription endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::SubscriptionStatusView;
use crate::domain::billing::{CartItem, SubscriptionPlan, WebhookOutcome};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/payments/{gateway}/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// Catalog entry as listed by `GET /api/subscriptions`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_days: i32,
}

impl From<SubscriptionPlan> for PlanResponse {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            id: plan.id.as_i64(),
            name: plan.name,
            description: plan.description,
            price: plan.price,
            duration_days: plan.duration_days,
        }
    }
}

/// Body of `GET /api/me/subscription`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    /// Plan name, or null for users who never subscribed.
    pub subscription: Option<String>,
    pub status: Option<String>,
    /// RFC 3339 expiry of the current grant.
    pub period_end: Option<String>,
    pub active: bool,
}

impl From<SubscriptionStatusView> for SubscriptionStatusResponse {
    fn from(view: SubscriptionStatusView) -> Self {
        Self {
            subscription: view.plan_name,
            status: view.status,
            period_end: view.period_end.map(|t| t.to_string()),
            active: view.active,
        }
    }
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
    pub outcome: &'static str,
}

impl From<&WebhookOutcome> for WebhookAckResponse {
    fn from(outcome: &WebhookOutcome) -> Self {
        Self {
            received: true,
            outcome: outcome.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanId, Timestamp};

    #[test]
    fn checkout_request_accepts_client_amount() {
        let body = r#"{"items":[{"id":"ExBird","amount":123}]}"#;
        let request: CheckoutRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].id, "ExBird");
        assert_eq!(request.items[0].amount, Some(123));
    }

    #[test]
    fn checkout_response_uses_camel_case() {
        let json = serde_json::to_value(CheckoutResponse {
            checkout_url: "https://pay.payos.vn/web/abc".to_string(),
        })
        .unwrap();
        assert_eq!(json["checkoutUrl"], "https://pay.payos.vn/web/abc");
    }

    #[test]
    fn subscription_status_serializes_expected_keys() {
        let view = SubscriptionStatusView {
            plan_name: Some("ExBird".to_string()),
            status: Some("active".to_string()),
            period_end: Timestamp::from_unix_secs(1_700_000_000),
            active: true,
        };
        let json = serde_json::to_value(SubscriptionStatusResponse::from(view)).unwrap();
        assert_eq!(json["subscription"], "ExBird");
        assert_eq!(json["status"], "active");
        assert_eq!(json["periodEnd"], "2023-11-14T22:13:20+00:00");
        assert_eq!(json["active"], true);
    }

    #[test]
    fn never_subscribed_serializes_nulls() {
        let view = SubscriptionStatusView {
            plan_name: None,
            status: None,
            period_end: None,
            active: false,
        };
        let json = serde_json::to_value(SubscriptionStatusResponse::from(view)).unwrap();
        assert!(json["subscription"].is_null());
        assert!(json["periodEnd"].is_null());
        assert_eq!(json["active"], false);
    }

    #[test]
    fn plan_response_keeps_catalog_fields() {
        let plan = SubscriptionPlan {
            id: PlanId::new(3),
            name: "ExBird".to_string(),
            description: Some("Premium".to_string()),
            price: 200.0,
            duration_days: 30,
        };
        let json = serde_json::to_value(PlanResponse::from(plan)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["duration_days"], 30);
    }
}
