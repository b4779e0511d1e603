//! Billing command and query handlers.

mod create_payment_link;
mod get_subscription_status;
mod grant_subscription;
mod handle_gateway_webhook;
mod list_plans;
mod payment_gateways;

pub use create_payment_link::{CreatePaymentLinkCommand, CreatePaymentLinkHandler, CreatePaymentLinkResult};
pub use get_subscription_status::{
    GetSubscriptionStatusHandler, GetSubscriptionStatusQuery, SubscriptionStatusView,
};
pub use grant_subscription::{GrantSubscriptionCommand, GrantSubscriptionHandler};
pub use handle_gateway_webhook::{HandleGatewayWebhookCommand, HandleGatewayWebhookHandler};
pub use list_plans::ListPlansHandler;
pub use payment_gateways::PaymentGateways;
