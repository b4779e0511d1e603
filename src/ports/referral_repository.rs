//! Referral ledger port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReferralId, UserId};
use crate::domain::referral::Referral;

#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// The pending referral naming `referee_id`, if any.
    ///
    /// At most one pending referral exists per referee.
    async fn find_pending_by_referee(
        &self,
        referee_id: UserId,
    ) -> Result<Option<Referral>, DomainError>;

    /// Conditionally marks the referral completed and stamps `completed_at`.
    ///
    /// Returns `Ok(false)` if it was no longer pending.
    async fn mark_completed(&self, id: ReferralId) -> Result<bool, DomainError>;
}
