//! Subscription catalog entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, Timestamp};

/// A purchasable subscription plan such as "ExBird".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    /// Unique display name, also used as the cart item id.
    pub name: String,
    pub description: Option<String>,
    /// Price in major currency units.
    pub price: f64,
    pub duration_days: i32,
}

impl SubscriptionPlan {
    /// Price the server charges, in minor units (`price * 100`).
    pub fn amount_minor_units(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }

    /// Expiry for a grant issued at `now`, `None` when the duration overflows.
    pub fn period_end_from(&self, now: Timestamp) -> Option<Timestamp> {
        now.add_days(i64::from(self.duration_days))
    }

    /// Case-insensitive match against a cart item id.
    pub fn matches_item(&self, item_id: &str) -> bool {
        self.name.eq_ignore_ascii_case(item_id.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exbird(price: f64) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(1),
            name: "ExBird".to_string(),
            description: None,
            price,
            duration_days: 30,
        }
    }

    #[test]
    fn amount_is_price_times_one_hundred() {
        assert_eq!(exbird(200.0).amount_minor_units(), 20000);
        assert_eq!(exbird(4.99).amount_minor_units(), 499);
    }

    #[test]
    fn period_end_adds_duration() {
        let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        assert_eq!(exbird(1.0).period_end_from(now), now.add_days(30));
    }

    #[test]
    fn period_end_overflow_is_none() {
        let plan = SubscriptionPlan {
            duration_days: i32::MAX,
            ..exbird(1.0)
        };
        assert!(plan.period_end_from(Timestamp::now()).is_none());
    }

    #[test]
    fn item_match_ignores_case_and_whitespace() {
        let plan = exbird(1.0);
        assert!(plan.matches_item(" exbird "));
        assert!(!plan.matches_item("exbird-pro"));
    }
}
