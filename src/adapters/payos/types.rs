//! PayOS wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /v2/payment-requests`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_code: i64,
    pub amount: i64,
    pub description: String,
    pub buyer_name: String,
    pub buyer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
    pub items: Vec<PaymentItem>,
    pub cancel_url: String,
    pub return_url: String,
    /// Unix seconds after which the link stops accepting payment.
    pub expired_at: i64,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentItem {
    pub name: String,
    pub quantity: u32,
    pub price: i64,
}

/// Envelope PayOS wraps every API response in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    #[serde(default)]
    pub desc: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkData {
    pub checkout_url: String,
    #[serde(default)]
    pub payment_link_id: Option<String>,
}

/// Verified webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    pub code: String,
    #[serde(default)]
    pub desc: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub order_code: i64,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transaction_date_time: Option<String>,
}

/// Code PayOS uses for success, both in API responses and webhooks.
pub const SUCCESS_CODE: &str = "00";
