//! HTTP adapter - REST API for checkout, subscriptions and gateway webhooks.

pub mod billing;
pub mod error;
pub mod middleware;

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use billing::{billing_router, BillingAppState};
pub use error::{ApiError, ErrorBody};
pub use middleware::{auth_middleware, AuthState, RequireAuth};

/// Builds the complete application router.
///
/// Every route passes through the auth middleware; only routes extracting
/// `RequireAuth` actually demand a principal.
pub fn app_router(
    state: BillingAppState,
    auth: AuthState,
    request_timeout: Duration,
    body_limit_bytes: usize,
) -> Router {
    Router::new()
        .route("/health", get(billing::health))
        .nest("/api", billing_router())
        .layer(from_fn_with_state(auth, auth_middleware))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
