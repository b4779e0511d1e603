//! HTTP adapter for payments and subscriptions.
//!
//! - `POST /api/payments/:gateway/checkout` - Start a checkout
//! - `GET /api/subscriptions` - Catalog listing
//! - `GET /api/me/subscription` - Caller's current plan
//! - `POST /api/webhooks/payos` - PayOS callbacks
//! - `POST /api/webhooks/stripe` - Stripe callbacks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{health, BillingAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::billing_router;
