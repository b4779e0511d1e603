//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;
pub mod email;
pub mod referral;

pub use billing::{
    CreatePaymentLinkCommand, CreatePaymentLinkHandler, CreatePaymentLinkResult,
    GetSubscriptionStatusHandler, GetSubscriptionStatusQuery, GrantSubscriptionCommand,
    GrantSubscriptionHandler, HandleGatewayWebhookCommand, HandleGatewayWebhookHandler,
    ListPlansHandler, PaymentGateways, SubscriptionStatusView,
};
pub use email::{payment_receipt, EmailDispatcher};
pub use referral::{
    CompleteReferralCommand, CompleteReferralHandler, CompleteReferralOutcome, ReferralTrigger,
};
