//! ReferralTrigger - Schedules referral completion off the request path.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::ports::{Job, JobFailure, JobQueue};

use super::{CompleteReferralCommand, CompleteReferralHandler};

/// Entry point for the post service.
///
/// Call after a post is stored. The check runs on the background pool; the
/// caller never waits for it and never sees its errors.
#[derive(Clone)]
pub struct ReferralTrigger {
    handler: Arc<CompleteReferralHandler>,
    jobs: Arc<dyn JobQueue>,
}

impl ReferralTrigger {
    pub fn new(handler: Arc<CompleteReferralHandler>, jobs: Arc<dyn JobQueue>) -> Self {
        Self { handler, jobs }
    }

    /// Returns `true` if the check was scheduled.
    pub fn on_post_created(&self, user_id: UserId) -> bool {
        let handler = self.handler.clone();
        let job = Job::new("complete_referral", async move {
            handler
                .handle(CompleteReferralCommand { user_id })
                .await
                .map(|outcome| {
                    tracing::debug!(user_id = %user_id, outcome = ?outcome, "Referral check finished");
                })
                .map_err(JobFailure::from)
        });

        match self.jobs.try_submit(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    critical = true,
                    user_id = %user_id,
                    error = %e,
                    "Referral check not scheduled"
                );
                false
            }
        }
    }
}
