//! Notification persistence port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::referral::{NewNotification, Notification};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> Result<Notification, DomainError>;
}
