//! HTTP handlers for payment, subscription and webhook endpoints.
//!
//! These handlers connect axum routes to the application layer handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::billing::{
    CreatePaymentLinkCommand, CreatePaymentLinkHandler, GetSubscriptionStatusHandler,
    GetSubscriptionStatusQuery, GrantSubscriptionHandler, HandleGatewayWebhookCommand,
    HandleGatewayWebhookHandler, ListPlansHandler, PaymentGateways,
};
use crate::application::handlers::email::EmailDispatcher;
use crate::domain::billing::{BillingError, GatewayKind};
use crate::ports::{OrderRepository, PlanCatalog, UserAccountRepository};

use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::dto::{
    CheckoutRequest, CheckoutResponse, HealthResponse, PlanResponse, SubscriptionStatusResponse,
    WebhookAckResponse,
};

/// Header carrying the Stripe webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for billing routes. Cloned per request.
#[derive(Clone)]
pub struct BillingAppState {
    pub gateways: PaymentGateways,
    pub orders: Arc<dyn OrderRepository>,
    pub plans: Arc<dyn PlanCatalog>,
    pub users: Arc<dyn UserAccountRepository>,
    /// Receipts are skipped when no dispatcher is configured.
    pub emails: Option<EmailDispatcher>,
}

impl BillingAppState {
    pub fn create_payment_link_handler(&self) -> CreatePaymentLinkHandler {
        CreatePaymentLinkHandler::new(
            self.gateways.clone(),
            self.plans.clone(),
            self.orders.clone(),
            self.users.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandleGatewayWebhookHandler {
        let grants = Arc::new(GrantSubscriptionHandler::new(
            self.plans.clone(),
            self.users.clone(),
        ));
        let handler = HandleGatewayWebhookHandler::new(
            self.gateways.clone(),
            self.orders.clone(),
            self.plans.clone(),
            self.users.clone(),
            grants,
        );
        match &self.emails {
            Some(emails) => handler.with_receipts(emails.clone()),
            None => handler,
        }
    }

    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.plans.clone())
    }

    pub fn subscription_status_handler(&self) -> GetSubscriptionStatusHandler {
        GetSubscriptionStatusHandler::new(self.users.clone(), self.plans.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/subscriptions - Catalog listing
pub async fn list_subscriptions(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.list_plans_handler().handle().await?;
    let response: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/me/subscription - Caller's current plan
pub async fn get_my_subscription(
    State(state): State<BillingAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .subscription_status_handler()
        .handle(GetSubscriptionStatusQuery { user_id: user.id })
        .await?;
    Ok(Json(SubscriptionStatusResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/{gateway}/checkout - Issue a payment link
pub async fn create_checkout(
    State(state): State<BillingAppState>,
    Path(gateway): Path<String>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| BillingError::invalid_cart(e.body_text()))?;
    let cmd = CreatePaymentLinkCommand {
        user,
        gateway,
        items: request.items,
    };

    let result = state.create_payment_link_handler().handle(cmd).await?;

    Ok(Json(CheckoutResponse {
        checkout_url: result.checkout_url,
    }))
}

/// POST /api/webhooks/payos - PayOS signs inside the body
pub async fn handle_payos_webhook(
    State(state): State<BillingAppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    reconcile(&state, GatewayKind::PayOs, None, body).await
}

/// POST /api/webhooks/stripe - Signature arrives in `Stripe-Signature`
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    reconcile(&state, GatewayKind::Stripe, signature, body).await
}

async fn reconcile(
    state: &BillingAppState,
    gateway: GatewayKind,
    signature_header: Option<String>,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, ApiError> {
    let cmd = HandleGatewayWebhookCommand {
        gateway,
        payload: body.to_vec(),
        signature_header,
    };
    let outcome = state.webhook_handler().handle(cmd).await?;
    Ok(Json(WebhookAckResponse::from(&outcome)))
}
