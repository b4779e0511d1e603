//! GetSubscriptionStatusHandler - Query handler for the caller's current plan.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{PlanCatalog, UserAccountRepository};

/// Query for a user's subscription view.
#[derive(Debug, Clone, Copy)]
pub struct GetSubscriptionStatusQuery {
    pub user_id: UserId,
}

/// Read model of the subscription columns.
///
/// `active` is evaluated at read time; an expired grant keeps its plan
/// name and status string but reports `active = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionStatusView {
    pub plan_name: Option<String>,
    pub status: Option<String>,
    pub period_end: Option<Timestamp>,
    pub active: bool,
}

pub struct GetSubscriptionStatusHandler {
    users: Arc<dyn UserAccountRepository>,
    plans: Arc<dyn PlanCatalog>,
}

impl GetSubscriptionStatusHandler {
    pub fn new(users: Arc<dyn UserAccountRepository>, plans: Arc<dyn PlanCatalog>) -> Self {
        Self { users, plans }
    }

    pub async fn handle(&self, query: GetSubscriptionStatusQuery) -> Result<SubscriptionStatusView, DomainError> {
        let state = self
            .users
            .subscription_state(query.user_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", query.user_id))
            })?;

        let plan_name = match state.subscription_id {
            Some(plan_id) => self.plans.find_by_id(plan_id).await?.map(|p| p.name),
            None => None,
        };

        Ok(SubscriptionStatusView {
            active: state.is_active_at(Timestamp::now()),
            plan_name,
            status: state.status,
            period_end: state.period_end,
        })
    }
}
