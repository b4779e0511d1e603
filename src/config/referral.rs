//! Referral and background worker configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Referral reward settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReferralConfig {
    /// Catalog plan granted to a referrer
    #[serde(default = "default_reward_plan")]
    pub reward_plan: String,
}

impl ReferralConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reward_plan.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REFERRAL_REWARD_PLAN"));
        }
        Ok(())
    }
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            reward_plan: default_reward_plan(),
        }
    }
}

/// Background worker pool sizing
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    #[serde(default = "default_worker_count")]
    pub count: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl WorkersConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 || self.queue_capacity == 0 {
            return Err(ValidationError::InvalidWorkerPool);
        }
        Ok(())
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_reward_plan() -> String {
    "ExBird".to_string()
}

fn default_worker_count() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}
