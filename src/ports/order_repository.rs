//! Order ledger port.
//!
//! # Concurrency contract
//!
//! `transition_status` is a compare-and-set on a single row: it applies only
//! when the stored status still equals `from`. Two concurrent deliveries of
//! the same webhook therefore race on the row, exactly one of them observes
//! `true`, and only that one may grant the subscription.

use async_trait::async_trait;

use crate::domain::billing::{ExternalOrderId, GatewayKind, NewOrder, Order, OrderStatus};
use crate::domain::foundation::{DomainError, OrderId};

/// Repository port for the append-only order ledger.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new `PENDING` order and return the stored row.
    ///
    /// # Errors
    ///
    /// - `Conflict` if `(gateway, external_order_id)` already exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, order: NewOrder) -> Result<Order, DomainError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Look up the order a gateway callback refers to.
    async fn find_by_external_id(
        &self,
        gateway: GatewayKind,
        external_order_id: &ExternalOrderId,
    ) -> Result<Option<Order>, DomainError>;

    /// Atomically move `id` from `from` to `to`.
    ///
    /// Returns `Ok(false)` when the row was no longer in `from`.
    async fn transition_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError>;
}
