//! Billing domain module.
//!
//! Order ledger, subscription catalog, checkout cart rules, subscription
//! grants and gateway webhook verification.
//!
//! # Module Structure
//!
//! - `order` / `order_status` - Order entity and its forward-only lifecycle
//! - `plan` / `subscription` - Catalog entries and user subscription state
//! - `cart` - Server-side checkout validation
//! - `payos_signature` / `stripe_signature` - Gateway webhook authentication
//! - `webhook` - Verified events and reconciliation outcomes

mod cart;
mod errors;
mod gateway;
mod order;
mod order_status;
mod payos_signature;
mod plan;
mod signing;
mod stripe_signature;
mod subscription;
mod webhook;

pub use cart::{Cart, CartItem};
pub use errors::BillingError;
pub use gateway::GatewayKind;
pub use order::{next_order_code, ExternalOrderId, NewOrder, Order};
pub use order_status::OrderStatus;
pub use payos_signature::{canonical_data, PayOsSigner, PaymentRequestFields};
pub use plan::SubscriptionPlan;
pub use stripe_signature::{SignatureHeader, StripeSignatureVerifier, DEFAULT_TOLERANCE_SECS};
pub use subscription::{SubscriptionGrant, UserSubscriptionState, STATUS_ACTIVE};
pub use webhook::{PaymentEvent, WebhookError, WebhookOutcome};

#[cfg(test)]
pub use stripe_signature::compute_test_header;
