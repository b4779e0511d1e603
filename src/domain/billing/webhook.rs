//! Webhook verification results and reconciliation outcomes.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, OrderId, UserId};

use super::{ExternalOrderId, OrderStatus};

/// Errors that stop a webhook delivery before it reaches the ledger.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature missing or not matching the recomputed HMAC.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed timestamp is outside the replay window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Body or signature header could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Verified payload lacks a field reconciliation needs.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// No verifier is configured for this gateway.
    #[error("Gateway not configured: {0}")]
    GatewayNotConfigured(String),

    /// Ledger read or write failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the gateway should redeliver.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to an HTTP status.
    ///
    /// Gateways redeliver on any non-2xx, so only our own transient
    /// failures answer 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebhookError::GatewayNotConfigured(_) => StatusCode::NOT_FOUND,
            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Authenticity failures are security events.
    pub fn is_authentication_failure(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

/// What a verified delivery tells us about an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Money received for this order.
    Paid {
        external_order_id: ExternalOrderId,
        amount: Option<i64>,
    },
    /// Gateway reports the payment failed.
    Failed { external_order_id: ExternalOrderId },
    /// Checkout expired or was cancelled.
    Cancelled { external_order_id: ExternalOrderId },
    /// Non-success result code; nothing was paid.
    NotPaid { code: String, description: String },
    /// Event type this service does not act on.
    Ignored { event_type: String },
}

/// Result of a webhook delivery that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Order moved PENDING -> PAID and the plan was granted.
    Settled { order_id: OrderId, user_id: UserId },
    /// Order moved PENDING -> PAID but the grant write failed.
    SettledGrantFailed { order_id: OrderId, user_id: UserId },
    /// Order was already past PENDING; redelivery is a no-op.
    AlreadySettled { order_id: OrderId, status: OrderStatus },
    /// Order moved PENDING -> FAILED or CANCELLED.
    Closed { order_id: OrderId, status: OrderStatus },
    /// No order with this reference exists (dashboard test pings).
    UnknownOrder { external_order_id: ExternalOrderId },
    /// Non-success notification, acknowledged without mutation.
    NotPaid { code: String },
    /// Event type not relevant to the ledger.
    Ignored { event_type: String },
}

impl WebhookOutcome {
    /// Short label for response bodies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Settled { .. } => "settled",
            WebhookOutcome::SettledGrantFailed { .. } => "settled_grant_failed",
            WebhookOutcome::AlreadySettled { .. } => "already_settled",
            WebhookOutcome::Closed { .. } => "closed",
            WebhookOutcome::UnknownOrder { .. } => "unknown_order",
            WebhookOutcome::NotPaid { .. } => "not_paid",
            WebhookOutcome::Ignored { .. } => "ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_map_to_401() {
        assert_eq!(WebhookError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebhookError::TimestampOutOfRange.status_code(), StatusCode::UNAUTHORIZED);
        assert!(WebhookError::InvalidSignature.is_authentication_failure());
    }

    #[test]
    fn structural_failures_map_to_400() {
        assert_eq!(
            WebhookError::ParseError("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(WebhookError::MissingField("data").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn only_database_errors_ask_for_redelivery() {
        let db = WebhookError::Database("pool timed out".to_string());
        assert!(db.is_retryable());
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::MissingField("data").is_retryable());
    }

    #[test]
    fn domain_errors_become_database_errors() {
        let err: WebhookError = DomainError::database("deadlock").into();
        assert!(matches!(err, WebhookError::Database(_)));
    }
}
