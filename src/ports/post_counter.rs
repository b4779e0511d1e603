//! Read-only view onto the posts owned by the social feed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait PostCounter: Send + Sync {
    /// Number of posts authored by `user_id`.
    async fn count_by_user(&self, user_id: UserId) -> Result<i64, DomainError>;
}
