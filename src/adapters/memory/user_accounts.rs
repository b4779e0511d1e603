//! In-memory user accounts.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::billing::{SubscriptionGrant, UserSubscriptionState};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{UserAccountRepository, UserContact};

#[derive(Debug, Clone)]
struct Account {
    contact: UserContact,
    subscription: UserSubscriptionState,
}

#[derive(Debug, Default)]
pub struct InMemoryUserAccounts {
    accounts: RwLock<HashMap<UserId, Account>>,
    grants_applied: RwLock<Vec<(UserId, SubscriptionGrant)>>,
}

impl InMemoryUserAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with no subscription.
    pub async fn add_user(&self, contact: UserContact) {
        self.add_user_with_subscription(contact, UserSubscriptionState::default())
            .await;
    }

    pub async fn add_user_with_subscription(
        &self,
        contact: UserContact,
        subscription: UserSubscriptionState,
    ) {
        self.accounts.write().await.insert(
            contact.id,
            Account {
                contact,
                subscription,
            },
        );
    }

    /// Every grant written, in order. Lets tests count grant calls.
    pub async fn grants(&self) -> Vec<(UserId, SubscriptionGrant)> {
        self.grants_applied.read().await.clone()
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccounts {
    async fn find_contact(&self, user_id: UserId) -> Result<Option<UserContact>, DomainError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&user_id)
            .map(|a| a.contact.clone()))
    }

    async fn subscription_state(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscriptionState>, DomainError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&user_id)
            .map(|a| a.subscription.clone()))
    }

    async fn apply_grant(&self, user_id: UserId, grant: &SubscriptionGrant) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", user_id))
        })?;
        account.subscription = grant.clone().into_state();
        self.grants_applied.write().await.push((user_id, grant.clone()));
        Ok(())
    }
}
