//! In-app notifications written by the referral flow.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp, UserId};

/// Stored `notifications.type` for a referral reward.
pub const REFERRAL_REWARD: &str = "referral_reward";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: String,
    pub message: String,
}

impl NewNotification {
    /// Message telling a referrer their reward plan was granted.
    pub fn referral_reward(referrer_id: UserId, plan_name: &str, duration_days: i32) -> Self {
        Self {
            user_id: referrer_id,
            kind: REFERRAL_REWARD.to_string(),
            message: format!(
                "A friend you invited just shared their first sighting! You earned {} days of {}.",
                duration_days, plan_name
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
