//! PostgreSQL implementation of OrderRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::billing::{ExternalOrderId, GatewayKind, NewOrder, Order, OrderStatus};
use crate::domain::foundation::{DomainError, OrderId, PlanId, Timestamp, UserId};
use crate::ports::OrderRepository;

use super::query::{bounded, corrupt};

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    subscription_id: i64,
    payment_gateway: String,
    gateway_order_id: String,
    amount: i64,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            plan_id: PlanId::new(row.subscription_id),
            gateway: row
                .payment_gateway
                .parse()
                .map_err(|_| corrupt("payment_gateway", &row.payment_gateway))?,
            external_order_id: ExternalOrderId::new(row.gateway_order_id.clone())
                .map_err(|_| corrupt("gateway_order_id", &row.gateway_order_id))?,
            amount: row.amount,
            currency: row.currency,
            status: row.status.parse().map_err(|_| corrupt("status", &row.status))?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, subscription_id, payment_gateway, gateway_order_id, \
                             amount, currency, status, created_at, updated_at";

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
        let sql = format!(
            "INSERT INTO orders (user_id, subscription_id, payment_gateway, gateway_order_id, amount, currency, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            ORDER_COLUMNS
        );
        let row: OrderRow = bounded(
            "insert order",
            sqlx::query_as(&sql)
                .bind(order.user_id.as_i64())
                .bind(order.plan_id.as_i64())
                .bind(order.gateway.as_str())
                .bind(order.external_order_id.as_str())
                .bind(order.amount)
                .bind(&order.currency)
                .bind(OrderStatus::Pending.as_str())
                .fetch_one(&self.pool),
        )
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row: Option<OrderRow> = bounded(
            "find order",
            sqlx::query_as(&sql).bind(id.as_i64()).fetch_optional(&self.pool),
        )
        .await?;
        row.map(Order::try_from).transpose()
    }

    async fn find_by_external_id(
        &self,
        gateway: GatewayKind,
        external_order_id: &ExternalOrderId,
    ) -> Result<Option<Order>, DomainError> {
        let sql = format!(
            "SELECT {} FROM orders WHERE payment_gateway = $1 AND gateway_order_id = $2",
            ORDER_COLUMNS
        );
        let row: Option<OrderRow> = bounded(
            "find order by gateway reference",
            sqlx::query_as(&sql)
                .bind(gateway.as_str())
                .bind(external_order_id.as_str())
                .fetch_optional(&self.pool),
        )
        .await?;
        row.map(Order::try_from).transpose()
    }

    async fn transition_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let result = bounded(
            "update order status",
            sqlx::query(
                "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
            )
            .bind(to.as_str())
            .bind(id.as_i64())
            .bind(from.as_str())
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
