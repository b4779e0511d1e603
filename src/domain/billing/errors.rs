//! Billing-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidCart | 400 |
//! | UnsupportedGateway | 400 |
//! | AlreadySubscribed | 409 |
//! | GatewayUnavailable | 502 |
//! | PlanNotFound | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode};

use super::GatewayKind;

/// Errors raised while issuing a payment link or granting a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Cart contents are not a purchasable plan.
    InvalidCart { reason: String },

    /// The requested gateway is not configured on this deployment.
    UnsupportedGateway(String),

    /// The user already holds an active, unexpired grant of this plan.
    AlreadySubscribed { plan: String },

    /// The gateway call failed, timed out, or returned garbage.
    GatewayUnavailable { gateway: GatewayKind, reason: String },

    /// A plan referenced by configuration or an order is missing.
    PlanNotFound(String),

    /// Persistence failure.
    Infrastructure(String),
}

impl BillingError {
    pub fn invalid_cart(reason: impl Into<String>) -> Self {
        BillingError::InvalidCart {
            reason: reason.into(),
        }
    }

    pub fn already_subscribed(plan: impl Into<String>) -> Self {
        BillingError::AlreadySubscribed { plan: plan.into() }
    }

    pub fn gateway_unavailable(gateway: GatewayKind, reason: impl Into<String>) -> Self {
        BillingError::GatewayUnavailable {
            gateway,
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::InvalidCart { .. } => ErrorCode::InvalidCart,
            BillingError::UnsupportedGateway(_) => ErrorCode::UnsupportedGateway,
            BillingError::AlreadySubscribed { .. } => ErrorCode::AlreadySubscribed,
            BillingError::GatewayUnavailable { .. } => ErrorCode::GatewayUnavailable,
            BillingError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message. Gateway internals stay in the logs.
    pub fn message(&self) -> String {
        match self {
            BillingError::InvalidCart { reason } => format!("Invalid cart: {}", reason),
            BillingError::UnsupportedGateway(name) => {
                format!("Payment gateway '{}' is not available", name)
            }
            BillingError::AlreadySubscribed { plan } => {
                format!("You already have an active {} subscription", plan)
            }
            BillingError::GatewayUnavailable { .. } => {
                "Payment provider service is unavailable".to_string()
            }
            BillingError::PlanNotFound(_) => "Subscription plan is not configured".to_string(),
            BillingError::Infrastructure(_) => "Failed to process payment request".to_string(),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingError::GatewayUnavailable { .. } | BillingError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingError::GatewayUnavailable { gateway, reason } => {
                write!(f, "{} gateway unavailable: {}", gateway, reason)
            }
            BillingError::PlanNotFound(name) => write!(f, "Plan not found: {}", name),
            BillingError::Infrastructure(msg) => write!(f, "Infrastructure error: {}", msg),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for BillingError {}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::PlanNotFound => BillingError::PlanNotFound(err.message),
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat | ErrorCode::InvalidCart => {
                BillingError::InvalidCart {
                    reason: err.message,
                }
            }
            _ => BillingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<BillingError> for DomainError {
    fn from(err: BillingError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(BillingError::invalid_cart("x").code(), ErrorCode::InvalidCart);
        assert_eq!(
            BillingError::already_subscribed("ExBird").code(),
            ErrorCode::AlreadySubscribed
        );
        assert_eq!(
            BillingError::gateway_unavailable(GatewayKind::PayOs, "502").code(),
            ErrorCode::GatewayUnavailable
        );
    }

    #[test]
    fn gateway_message_hides_provider_details() {
        let err = BillingError::gateway_unavailable(GatewayKind::PayOs, "x-api-key rejected");
        assert_eq!(err.message(), "Payment provider service is unavailable");
        assert!(err.to_string().contains("x-api-key rejected"));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(BillingError::infrastructure("db down").is_retryable());
        assert!(BillingError::gateway_unavailable(GatewayKind::Stripe, "timeout").is_retryable());
        assert!(!BillingError::invalid_cart("empty").is_retryable());
        assert!(!BillingError::already_subscribed("ExBird").is_retryable());
    }

    #[test]
    fn domain_errors_convert_by_code() {
        let err: BillingError = DomainError::new(ErrorCode::PlanNotFound, "ExBird").into();
        assert_eq!(err, BillingError::PlanNotFound("ExBird".to_string()));

        let err: BillingError = DomainError::database("timeout").into();
        assert!(matches!(err, BillingError::Infrastructure(_)));
    }
}
