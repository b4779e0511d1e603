//! CompleteReferralHandler - Rewards a referrer when their invitee posts for the first time.
//!
//! The referral is claimed with a compare-and-set before any reward is
//! written. A concurrent duplicate run loses the claim and does nothing, so
//! a referrer is rewarded at most once per referral. The trade-off is that a
//! grant failure after the claim leaves a completed referral without a
//! reward; that case is logged as critical for manual repair.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ReferralId, UserId};
use crate::domain::referral::{qualifies_for_completion, NewNotification};
use crate::ports::{NotificationRepository, PlanCatalog, PostCounter, ReferralRepository};

use crate::application::handlers::billing::GrantSubscriptionHandler;

/// Command issued after a post was stored.
#[derive(Debug, Clone, Copy)]
pub struct CompleteReferralCommand {
    /// Author of the new post, the potential referee.
    pub user_id: UserId,
}

/// What a trigger run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteReferralOutcome {
    /// The author has zero or more than one post.
    NotFirstPost { post_count: i64 },
    /// The author was not referred, or the referral is already done.
    NoPendingReferral,
    /// Another run claimed the referral first.
    AlreadyClaimed { referral_id: ReferralId },
    /// Referral completed and the referrer rewarded.
    Completed {
        referral_id: ReferralId,
        referrer_id: UserId,
        notified: bool,
    },
    /// Referral completed but the reward could not be granted.
    RewardFailed {
        referral_id: ReferralId,
        referrer_id: UserId,
    },
}

pub struct CompleteReferralHandler {
    posts: Arc<dyn PostCounter>,
    referrals: Arc<dyn ReferralRepository>,
    plans: Arc<dyn PlanCatalog>,
    grants: Arc<GrantSubscriptionHandler>,
    notifications: Arc<dyn NotificationRepository>,
    reward_plan: String,
}

impl CompleteReferralHandler {
    pub fn new(
        posts: Arc<dyn PostCounter>,
        referrals: Arc<dyn ReferralRepository>,
        plans: Arc<dyn PlanCatalog>,
        grants: Arc<GrantSubscriptionHandler>,
        notifications: Arc<dyn NotificationRepository>,
        reward_plan: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            referrals,
            plans,
            grants,
            notifications,
            reward_plan: reward_plan.into(),
        }
    }

    pub async fn handle(&self, cmd: CompleteReferralCommand) -> Result<CompleteReferralOutcome, DomainError> {
        // 1. Only the first post counts
        let post_count = self.posts.count_by_user(cmd.user_id).await?;
        if !qualifies_for_completion(post_count) {
            return Ok(CompleteReferralOutcome::NotFirstPost { post_count });
        }

        // 2. Find the referral this user registered with
        let Some(referral) = self.referrals.find_pending_by_referee(cmd.user_id).await? else {
            return Ok(CompleteReferralOutcome::NoPendingReferral);
        };

        // 3. Claim it
        let claimed = self.referrals.mark_completed(referral.id).await.map_err(|e| {
            tracing::error!(
                critical = true,
                referral_id = %referral.id,
                error = %e,
                "Failed to complete referral"
            );
            e
        })?;
        if !claimed {
            tracing::info!(referral_id = %referral.id, "Referral already claimed");
            return Ok(CompleteReferralOutcome::AlreadyClaimed {
                referral_id: referral.id,
            });
        }

        // 4. Reward the referrer
        let plan = match self.plans.find_by_name(&self.reward_plan).await {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                tracing::error!(
                    critical = true,
                    referral_id = %referral.id,
                    plan = %self.reward_plan,
                    "Referral reward plan is not in the catalog"
                );
                return Ok(CompleteReferralOutcome::RewardFailed {
                    referral_id: referral.id,
                    referrer_id: referral.referrer_id,
                });
            }
            Err(e) => {
                tracing::error!(
                    critical = true,
                    referral_id = %referral.id,
                    error = %e,
                    "Failed to load referral reward plan"
                );
                return Ok(CompleteReferralOutcome::RewardFailed {
                    referral_id: referral.id,
                    referrer_id: referral.referrer_id,
                });
            }
        };

        if let Err(e) = self.grants.grant(referral.referrer_id, &plan).await {
            tracing::error!(
                critical = true,
                referral_id = %referral.id,
                referrer_id = %referral.referrer_id,
                error = %e,
                "Referral completed but reward grant failed"
            );
            return Ok(CompleteReferralOutcome::RewardFailed {
                referral_id: referral.id,
                referrer_id: referral.referrer_id,
            });
        }

        // 5. Tell the referrer
        let notice =
            NewNotification::referral_reward(referral.referrer_id, &plan.name, plan.duration_days);
        let notified = match self.notifications.create(notice).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    critical = true,
                    referral_id = %referral.id,
                    referrer_id = %referral.referrer_id,
                    error = %e,
                    "Referral reward granted but notification failed"
                );
                false
            }
        };

        tracing::info!(
            referral_id = %referral.id,
            referrer_id = %referral.referrer_id,
            referee_id = %cmd.user_id,
            plan = %plan.name,
            "Referral completed"
        );

        Ok(CompleteReferralOutcome::Completed {
            referral_id: referral.id,
            referrer_id: referral.referrer_id,
            notified,
        })
    }
}
