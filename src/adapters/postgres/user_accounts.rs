//! PostgreSQL implementation of UserAccountRepository.
//!
//! Reads and writes only the billing columns of the shared `users` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::billing::{SubscriptionGrant, UserSubscriptionState};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, Timestamp, UserId};
use crate::ports::{UserAccountRepository, UserContact};

use super::query::bounded;

pub struct PostgresUserAccounts {
    pool: PgPool,
}

impl PostgresUserAccounts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i64,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    subscription_id: Option<i64>,
    subscription_status: Option<String>,
    subscription_period_end: Option<DateTime<Utc>>,
}

impl From<SubscriptionRow> for UserSubscriptionState {
    fn from(row: SubscriptionRow) -> Self {
        UserSubscriptionState {
            subscription_id: row.subscription_id.map(PlanId::new),
            status: row.subscription_status,
            period_end: row.subscription_period_end.map(Timestamp::from_datetime),
        }
    }
}

#[async_trait]
impl UserAccountRepository for PostgresUserAccounts {
    async fn find_contact(&self, user_id: UserId) -> Result<Option<UserContact>, DomainError> {
        let row: Option<ContactRow> = bounded(
            "find user",
            sqlx::query_as("SELECT id, email, first_name, last_name FROM users WHERE id = $1")
                .bind(user_id.as_i64())
                .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(|r| UserContact {
            id: UserId::new(r.id),
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
        }))
    }

    async fn subscription_state(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscriptionState>, DomainError> {
        let row: Option<SubscriptionRow> = bounded(
            "read subscription",
            sqlx::query_as(
                "SELECT subscription_id, subscription_status, subscription_period_end \
                 FROM users WHERE id = $1",
            )
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn apply_grant(&self, user_id: UserId, grant: &SubscriptionGrant) -> Result<(), DomainError> {
        let result = bounded(
            "grant subscription",
            sqlx::query(
                "UPDATE users SET subscription_id = $1, subscription_status = $2, \
                 subscription_period_end = $3, updated_at = NOW() WHERE id = $4",
            )
            .bind(grant.plan_id.as_i64())
            .bind(grant.status)
            .bind(grant.period_end.as_datetime())
            .bind(user_id.as_i64())
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", user_id),
            ));
        }
        Ok(())
    }
}
