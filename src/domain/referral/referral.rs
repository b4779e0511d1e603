//! Referral ledger entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ReferralId, StateMachine, Timestamp, UserId, ValidationError};

/// Lifecycle of a referral. `Pending -> Completed` is the only move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Completed,
}

impl ReferralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Completed => "completed",
        }
    }
}

impl StateMachine for ReferralStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (ReferralStatus::Pending, ReferralStatus::Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ReferralStatus::Pending => vec![ReferralStatus::Completed],
            ReferralStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferralStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReferralStatus::Pending),
            "completed" => Ok(ReferralStatus::Completed),
            other => Err(ValidationError::invalid_format(
                "referral_status",
                format!("unknown referral status '{}'", other),
            )),
        }
    }
}

/// A referrer/referee pair created when the referee registered with a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub id: ReferralId,
    pub referrer_id: UserId,
    pub referee_id: UserId,
    pub referral_code: String,
    pub status: ReferralStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Referral {
    pub fn is_pending(&self) -> bool {
        self.status == ReferralStatus::Pending
    }

    /// Marks the referral completed in memory.
    pub fn complete(&mut self, now: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ReferralStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// Only a referee's very first post completes their referral.
pub fn qualifies_for_completion(post_count: i64) -> bool {
    post_count == 1
}
