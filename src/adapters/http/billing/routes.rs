//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_checkout, get_my_subscription, handle_payos_webhook, handle_stripe_webhook,
    list_subscriptions, BillingAppState,
};

/// User-facing routes.
///
/// - `POST /payments/:gateway/checkout` (auth)
/// - `GET /subscriptions`
/// - `GET /me/subscription` (auth)
pub fn payment_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/payments/:gateway/checkout", post(create_checkout))
        .route("/subscriptions", get(list_subscriptions))
        .route("/me/subscription", get(get_my_subscription))
}

/// Gateway callbacks. No user auth; each request is signature verified.
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/payos", post(handle_payos_webhook))
        .route("/stripe", post(handle_stripe_webhook))
}

/// Billing routes, to be nested under `/api`.
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .merge(payment_routes())
        .nest("/webhooks", webhook_routes())
}
