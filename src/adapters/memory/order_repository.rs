//! In-memory order ledger for tests and local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::billing::{ExternalOrderId, GatewayKind, NewOrder, Order, OrderStatus};
use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::ports::OrderRepository;

/// Order ledger backed by a `Vec`. Transitions are serialized by the lock,
/// which gives the same compare-and-set semantics as the SQL adapter.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Snapshot of every stored order.
    pub async fn all(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut orders = self.orders.write().await;
        let duplicate = orders.iter().any(|o| {
            o.gateway == order.gateway && o.external_order_id == order.external_order_id
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Order {} already exists", order.external_order_id),
            ));
        }

        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = Order::from_new(id, order, Timestamp::now());
        orders.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_external_id(
        &self,
        gateway: GatewayKind,
        external_order_id: &ExternalOrderId,
    ) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.gateway == gateway && &o.external_order_id == external_order_id)
            .cloned())
    }

    async fn transition_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, format!("Order {} not found", id)))?;

        if order.status != from {
            return Ok(false);
        }
        order.transition(to, Timestamp::now())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanId, UserId};

    fn new_order(code: i64) -> NewOrder {
        NewOrder::new(
            UserId::new(1),
            PlanId::new(1),
            GatewayKind::PayOs,
            ExternalOrderId::from_order_code(code),
            20000,
            "VND",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_rejects_duplicates() {
        let repo = InMemoryOrderRepository::new();
        let first = repo.insert(new_order(1)).await.unwrap();
        let second = repo.insert(new_order(2)).await.unwrap();
        assert_ne!(first.id, second.id);

        let err = repo.insert(new_order(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn transition_is_compare_and_set() {
        let repo = InMemoryOrderRepository::new();
        let order = repo.insert(new_order(1)).await.unwrap();

        assert!(repo
            .transition_status(order.id, OrderStatus::Pending, OrderStatus::Paid)
            .await
            .unwrap());
        assert!(!repo
            .transition_status(order.id, OrderStatus::Pending, OrderStatus::Paid)
            .await
            .unwrap());

        let stored = repo.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn lookup_is_scoped_by_gateway() {
        let repo = InMemoryOrderRepository::new();
        repo.insert(new_order(7)).await.unwrap();

        let id = ExternalOrderId::from_order_code(7);
        assert!(repo.find_by_external_id(GatewayKind::PayOs, &id).await.unwrap().is_some());
        assert!(repo.find_by_external_id(GatewayKind::Stripe, &id).await.unwrap().is_none());
    }
}
