//! In-memory referral ledger and post counts.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ReferralId, Timestamp, UserId};
use crate::domain::referral::{Referral, ReferralStatus};
use crate::ports::{PostCounter, ReferralRepository};

#[derive(Debug, Default)]
pub struct InMemoryReferralRepository {
    referrals: RwLock<Vec<Referral>>,
}

impl InMemoryReferralRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pending referral, as registration would.
    pub async fn add_pending(&self, id: i64, referrer: UserId, referee: UserId, code: &str) {
        self.referrals.write().await.push(Referral {
            id: ReferralId::new(id),
            referrer_id: referrer,
            referee_id: referee,
            referral_code: code.to_string(),
            status: ReferralStatus::Pending,
            created_at: Timestamp::now(),
            completed_at: None,
        });
    }

    pub async fn all(&self) -> Vec<Referral> {
        self.referrals.read().await.clone()
    }
}

#[async_trait]
impl ReferralRepository for InMemoryReferralRepository {
    async fn find_pending_by_referee(
        &self,
        referee_id: UserId,
    ) -> Result<Option<Referral>, DomainError> {
        Ok(self
            .referrals
            .read()
            .await
            .iter()
            .find(|r| r.referee_id == referee_id && r.is_pending())
            .cloned())
    }

    async fn mark_completed(&self, id: ReferralId) -> Result<bool, DomainError> {
        let mut referrals = self.referrals.write().await;
        match referrals.iter_mut().find(|r| r.id == id && r.is_pending()) {
            Some(referral) => {
                referral.complete(Timestamp::now())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Post counts keyed by author.
#[derive(Debug, Default)]
pub struct InMemoryPostCounter {
    counts: RwLock<HashMap<UserId, i64>>,
}

impl InMemoryPostCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the feed storing a new post.
    pub async fn record_post(&self, author: UserId) -> i64 {
        let mut counts = self.counts.write().await;
        let count = counts.entry(author).or_insert(0);
        *count += 1;
        *count
    }
}

#[async_trait]
impl PostCounter for InMemoryPostCounter {
    async fn count_by_user(&self, user_id: UserId) -> Result<i64, DomainError> {
        Ok(self.counts.read().await.get(&user_id).copied().unwrap_or(0))
    }
}
