//! PostgreSQL implementations of ReferralRepository and PostCounter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ReferralId, Timestamp, UserId};
use crate::domain::referral::{Referral, ReferralStatus};
use crate::ports::{PostCounter, ReferralRepository};

use super::query::{bounded, corrupt};

pub struct PostgresReferralRepository {
    pool: PgPool,
}

impl PostgresReferralRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReferralRow {
    id: i64,
    referrer_id: i64,
    referee_id: i64,
    referral_code_used: String,
    status: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReferralRow> for Referral {
    type Error = DomainError;

    fn try_from(row: ReferralRow) -> Result<Self, Self::Error> {
        Ok(Referral {
            id: ReferralId::new(row.id),
            referrer_id: UserId::new(row.referrer_id),
            referee_id: UserId::new(row.referee_id),
            referral_code: row.referral_code_used,
            status: row.status.parse().map_err(|_| corrupt("status", &row.status))?,
            created_at: Timestamp::from_datetime(row.created_at),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl ReferralRepository for PostgresReferralRepository {
    async fn find_pending_by_referee(
        &self,
        referee_id: UserId,
    ) -> Result<Option<Referral>, DomainError> {
        let row: Option<ReferralRow> = bounded(
            "find pending referral",
            sqlx::query_as(
                "SELECT id, referrer_id, referee_id, referral_code_used, status, created_at, completed_at \
                 FROM referrals WHERE referee_id = $1 AND status = $2 LIMIT 1",
            )
            .bind(referee_id.as_i64())
            .bind(ReferralStatus::Pending.as_str())
            .fetch_optional(&self.pool),
        )
        .await?;
        row.map(Referral::try_from).transpose()
    }

    async fn mark_completed(&self, id: ReferralId) -> Result<bool, DomainError> {
        let result = bounded(
            "complete referral",
            sqlx::query(
                "UPDATE referrals SET status = $1, completed_at = NOW() WHERE id = $2 AND status = $3",
            )
            .bind(ReferralStatus::Completed.as_str())
            .bind(id.as_i64())
            .bind(ReferralStatus::Pending.as_str())
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

/// Counts rows in the feed's `posts` table.
pub struct PostgresPostCounter {
    pool: PgPool,
}

impl PostgresPostCounter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostCounter for PostgresPostCounter {
    async fn count_by_user(&self, user_id: UserId) -> Result<i64, DomainError> {
        bounded(
            "count posts",
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
                .bind(user_id.as_i64())
                .fetch_one(&self.pool),
        )
        .await
    }
}
