//! GrantSubscriptionHandler - The single writer of a user's subscription columns.

use std::sync::Arc;

use crate::domain::billing::{SubscriptionGrant, SubscriptionPlan};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId, Timestamp, UserId};
use crate::ports::{PlanCatalog, UserAccountRepository};

/// Command to grant a plan to a user.
#[derive(Debug, Clone, Copy)]
pub struct GrantSubscriptionCommand {
    pub user_id: UserId,
    pub plan_id: PlanId,
}

/// Handler that activates a plan for `duration_days` from now.
///
/// A second grant overwrites the first; periods do not stack.
pub struct GrantSubscriptionHandler {
    plans: Arc<dyn PlanCatalog>,
    users: Arc<dyn UserAccountRepository>,
}

impl GrantSubscriptionHandler {
    pub fn new(plans: Arc<dyn PlanCatalog>, users: Arc<dyn UserAccountRepository>) -> Self {
        Self { plans, users }
    }

    pub async fn handle(&self, cmd: GrantSubscriptionCommand) -> Result<SubscriptionGrant, DomainError> {
        let plan = self.plans.find_by_id(cmd.plan_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Subscription plan {} not found", cmd.plan_id),
            )
        })?;
        self.grant(cmd.user_id, &plan).await
    }

    /// Grants an already loaded plan.
    pub async fn grant(&self, user_id: UserId, plan: &SubscriptionPlan) -> Result<SubscriptionGrant, DomainError> {
        let grant = SubscriptionGrant::for_plan(plan, Timestamp::now())?;
        self.users.apply_grant(user_id, &grant).await?;

        tracing::info!(
            user_id = %user_id,
            plan = %plan.name,
            period_end = %grant.period_end,
            "Subscription granted"
        );
        Ok(grant)
    }
}
