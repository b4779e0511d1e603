//! User account port.
//!
//! The user table is owned by the wider application. Billing reads contact
//! details and the subscription columns, and writes only the latter.

use async_trait::async_trait;

use crate::domain::billing::{SubscriptionGrant, UserSubscriptionState};
use crate::domain::foundation::{DomainError, UserId};

/// Contact details used for receipts and gateway buyer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContact {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    async fn find_contact(&self, user_id: UserId) -> Result<Option<UserContact>, DomainError>;

    /// Current subscription columns, `None` if the user does not exist.
    async fn subscription_state(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscriptionState>, DomainError>;

    /// Writes plan, status and period end in a single update.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no row was updated
    /// - `DatabaseError` on persistence failure
    async fn apply_grant(&self, user_id: UserId, grant: &SubscriptionGrant) -> Result<(), DomainError>;
}
