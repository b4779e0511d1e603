//! PostgreSQL implementation of PlanCatalog over the `subscriptions` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::PlanCatalog;

use super::query::bounded;

pub struct PostgresPlanCatalog {
    pool: PgPool,
}

impl PostgresPlanCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    duration_days: i32,
}

impl From<PlanRow> for SubscriptionPlan {
    fn from(row: PlanRow) -> Self {
        SubscriptionPlan {
            id: PlanId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            duration_days: row.duration_days,
        }
    }
}

#[async_trait]
impl PlanCatalog for PostgresPlanCatalog {
    async fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = bounded(
            "find plan by name",
            sqlx::query_as(
                "SELECT id, name, description, price::float8 AS price, duration_days \
                 FROM subscriptions WHERE LOWER(name) = LOWER($1)",
            )
            .bind(name.trim())
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = bounded(
            "find plan",
            sqlx::query_as(
                "SELECT id, name, description, price::float8 AS price, duration_days \
                 FROM subscriptions WHERE id = $1",
            )
            .bind(id.as_i64())
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let rows: Vec<PlanRow> = bounded(
            "list plans",
            sqlx::query_as(
                "SELECT id, name, description, price::float8 AS price, duration_days \
                 FROM subscriptions ORDER BY price, id",
            )
            .fetch_all(&self.pool),
        )
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
