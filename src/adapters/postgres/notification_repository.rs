//! PostgreSQL implementation of NotificationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, NotificationId, Timestamp, UserId};
use crate::domain::referral::{NewNotification, Notification};
use crate::ports::NotificationRepository;

use super::query::bounded;

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: NotificationId::new(row.id),
            user_id: UserId::new(row.user_id),
            kind: row.kind,
            message: row.message,
            is_read: row.is_read,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        let row: NotificationRow = bounded(
            "create notification",
            sqlx::query_as(
                "INSERT INTO notifications (user_id, type, message) VALUES ($1, $2, $3) \
                 RETURNING id, user_id, type, message, is_read, created_at",
            )
            .bind(notification.user_id.as_i64())
            .bind(&notification.kind)
            .bind(&notification.message)
            .fetch_one(&self.pool),
        )
        .await?;
        Ok(row.into())
    }
}
