//! Order ledger entity.
//!
//! One row per purchase attempt. Rows are created `PENDING` by the payment
//! link issuer, settled by the webhook reconciler, and never deleted.
//!
//! # Invariants
//!
//! - `(gateway, external_order_id)` is unique
//! - `amount` is positive and expressed in minor currency units
//! - status only moves forward (see [`OrderStatus`])

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    OrderId, PlanId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::{GatewayKind, OrderStatus};

/// Gateway-facing order reference.
///
/// PayOS requires an integer `orderCode`; Stripe accepts any string. Both are
/// stored as text in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalOrderId(String);

impl ExternalOrderId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::empty_field("external_order_id"));
        }
        Ok(Self(id))
    }

    pub fn from_order_code(code: i64) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, for gateways that address orders by integer code.
    pub fn as_order_code(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ExternalOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Largest integer a JSON consumer can represent exactly (2^53 - 1).
const MAX_ORDER_CODE: i64 = 9_007_199_254_740_991;

/// Generates a gateway order code.
///
/// The code is the millisecond timestamp shifted left by three decimal digits
/// plus a random suffix, so two requests landing in the same millisecond
/// still get distinct codes with high probability.
pub fn next_order_code(now: Timestamp) -> i64 {
    let suffix = (uuid::Uuid::new_v4().as_u128() % 1000) as i64;
    let code = now.as_unix_millis().saturating_mul(1000).saturating_add(suffix);
    code.min(MAX_ORDER_CODE)
}

/// Insert payload for a new purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub gateway: GatewayKind,
    pub external_order_id: ExternalOrderId,
    pub amount: i64,
    pub currency: String,
}

impl NewOrder {
    /// Validates and builds a pending order.
    pub fn new(
        user_id: UserId,
        plan_id: PlanId,
        gateway: GatewayKind,
        external_order_id: ExternalOrderId,
        amount: i64,
        currency: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if amount <= 0 {
            return Err(ValidationError::out_of_range("amount", 1, i64::MAX, amount));
        }
        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO 4217 code",
            ));
        }
        Ok(Self {
            user_id,
            plan_id,
            gateway,
            external_order_id,
            amount,
            currency,
        })
    }
}

/// A persisted purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub gateway: GatewayKind,
    pub external_order_id: ExternalOrderId,
    pub amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Materializes a freshly inserted row.
    pub fn from_new(id: OrderId, new: NewOrder, now: Timestamp) -> Self {
        Self {
            id,
            user_id: new.user_id,
            plan_id: new.plan_id,
            gateway: new.gateway,
            external_order_id: new.external_order_id,
            amount: new.amount,
            currency: new.currency,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Applies a validated status change in memory.
    pub fn transition(&mut self, target: OrderStatus, now: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(amount: i64, currency: &str) -> Result<NewOrder, ValidationError> {
        NewOrder::new(
            UserId::new(1),
            PlanId::new(2),
            GatewayKind::PayOs,
            ExternalOrderId::from_order_code(171234),
            amount,
            currency,
        )
    }

    #[test]
    fn external_id_rejects_blank() {
        assert!(ExternalOrderId::new("   ").is_err());
        assert_eq!(ExternalOrderId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn external_id_exposes_numeric_code() {
        assert_eq!(ExternalOrderId::from_order_code(171234).as_order_code(), Some(171234));
        assert_eq!(ExternalOrderId::new("cs_abc").unwrap().as_order_code(), None);
    }

    #[test]
    fn new_order_normalizes_currency() {
        let order = new_order(20000, "vnd").unwrap();
        assert_eq!(order.currency, "VND");
    }

    #[test]
    fn new_order_rejects_non_positive_amount() {
        assert!(new_order(0, "VND").is_err());
        assert!(new_order(-5, "VND").is_err());
    }

    #[test]
    fn new_order_rejects_bad_currency() {
        assert!(new_order(100, "VN").is_err());
        assert!(new_order(100, "V1D").is_err());
    }

    #[test]
    fn from_new_starts_pending() {
        let now = Timestamp::now();
        let order = Order::from_new(OrderId::new(10), new_order(20000, "VND").unwrap(), now);
        assert!(order.is_pending());
        assert_eq!(order.created_at, now);
    }

    #[test]
    fn transition_updates_status_and_timestamp() {
        let created = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let mut order = Order::from_new(OrderId::new(10), new_order(20000, "VND").unwrap(), created);
        let later = created.add_minutes(3).unwrap();

        order.transition(OrderStatus::Paid, later).unwrap();

        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.updated_at, later);
    }

    #[test]
    fn paid_order_cannot_be_failed_afterwards() {
        let now = Timestamp::now();
        let mut order = Order::from_new(OrderId::new(10), new_order(20000, "VND").unwrap(), now);
        order.transition(OrderStatus::Paid, now).unwrap();

        assert!(order.transition(OrderStatus::Failed, now).is_err());
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn order_codes_embed_the_timestamp() {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let code = next_order_code(now);
        assert_eq!(code / 1000, now.as_unix_millis());
        assert!(code <= MAX_ORDER_CODE);
    }

    #[test]
    fn order_codes_in_the_same_millisecond_usually_differ() {
        let now = Timestamp::now();
        let codes: std::collections::HashSet<i64> = (0..20).map(|_| next_order_code(now)).collect();
        assert!(codes.len() > 1);
    }
}
