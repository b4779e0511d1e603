//! Subscription state carried on the user record.
//!
//! Only the grant operation writes these fields. Expiry is evaluated when the
//! state is read; nothing flips a stored flag when the period ends.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, Timestamp};

use super::SubscriptionPlan;

/// Stored value of `users.subscription_status` for a live grant.
pub const STATUS_ACTIVE: &str = "active";

/// Subscription columns of a user row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubscriptionState {
    pub subscription_id: Option<PlanId>,
    pub status: Option<String>,
    pub period_end: Option<Timestamp>,
}

impl UserSubscriptionState {
    /// True when the status is active and the period has not ended yet.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.status.as_deref() == Some(STATUS_ACTIVE)
            && self.period_end.map_or(false, |end| end.is_after(&now))
    }

    /// True when `plan_id` is the plan currently in force.
    pub fn holds_plan_at(&self, plan_id: PlanId, now: Timestamp) -> bool {
        self.subscription_id == Some(plan_id) && self.is_active_at(now)
    }
}

/// The single write performed by the grant operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionGrant {
    pub plan_id: PlanId,
    pub status: &'static str,
    pub period_end: Timestamp,
}

impl SubscriptionGrant {
    /// Grant starting at `now`. Any earlier period end is overwritten, not extended.
    ///
    /// Fails when the plan's duration does not fit a calendar date.
    pub fn for_plan(plan: &SubscriptionPlan, now: Timestamp) -> Result<Self, DomainError> {
        let period_end = plan.period_end_from(now).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Plan {} has an out-of-range duration", plan.id),
            )
            .with_detail("duration_days", plan.duration_days.to_string())
        })?;

        Ok(Self {
            plan_id: plan.id,
            status: STATUS_ACTIVE,
            period_end,
        })
    }

    pub fn into_state(self) -> UserSubscriptionState {
        UserSubscriptionState {
            subscription_id: Some(self.plan_id),
            status: Some(self.status.to_string()),
            period_end: Some(self.period_end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(days: i32) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(3),
            name: "ExBird".to_string(),
            description: None,
            price: 200.0,
            duration_days: days,
        }
    }

    #[test]
    fn empty_state_is_not_active() {
        assert!(!UserSubscriptionState::default().is_active_at(Timestamp::now()));
    }

    #[test]
    fn active_until_period_end() {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let state = SubscriptionGrant::for_plan(&plan(30), now).unwrap().into_state();

        assert!(state.is_active_at(now));
        assert!(state.is_active_at(now.add_days(29).unwrap()));
        assert!(!state.is_active_at(now.add_days(30).unwrap()));
    }

    #[test]
    fn expired_status_string_is_not_active() {
        let now = Timestamp::now();
        let state = UserSubscriptionState {
            subscription_id: Some(PlanId::new(3)),
            status: Some("expired".to_string()),
            period_end: Some(now.add_days(5).unwrap()),
        };
        assert!(!state.is_active_at(now));
    }

    #[test]
    fn holds_plan_requires_same_plan() {
        let now = Timestamp::now();
        let state = SubscriptionGrant::for_plan(&plan(30), now).unwrap().into_state();

        assert!(state.holds_plan_at(PlanId::new(3), now));
        assert!(!state.holds_plan_at(PlanId::new(4), now));
    }

    #[test]
    fn grant_overwrites_rather_than_stacks() {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let first = SubscriptionGrant::for_plan(&plan(30), now).unwrap();
        let second = SubscriptionGrant::for_plan(&plan(30), now).unwrap();
        assert_eq!(first.period_end, second.period_end);
    }

    #[test]
    fn oversized_duration_is_an_error() {
        let err = SubscriptionGrant::for_plan(&plan(i32::MAX), Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
