//! In-memory notification store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, NotificationId, Timestamp};
use crate::domain::referral::{NewNotification, Notification};
use crate::ports::NotificationRepository;

#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        let mut notifications = self.notifications.write().await;
        let stored = Notification {
            id: NotificationId::new(notifications.len() as i64 + 1),
            user_id: notification.user_id,
            kind: notification.kind,
            message: notification.message,
            is_read: false,
            created_at: Timestamp::now(),
        };
        notifications.push(stored.clone());
        Ok(stored)
    }
}
