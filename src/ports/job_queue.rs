//! Background job submission port.
//!
//! Work that must not block or fail a user-facing request (referral rewards,
//! emails) is submitted here and executed by a bounded worker pool. Job
//! failures are logged by the pool, never returned to the submitter.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::foundation::DomainError;
use super::MailError;

/// Failure reported by a detached job. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct JobFailure(pub String);

impl From<DomainError> for JobFailure {
    fn from(err: DomainError) -> Self {
        JobFailure(err.to_string())
    }
}

impl From<MailError> for JobFailure {
    fn from(err: MailError) -> Self {
        JobFailure(err.to_string())
    }
}

/// A named unit of detached work.
pub struct Job {
    pub name: &'static str,
    pub task: BoxFuture<'static, Result<(), JobFailure>>,
}

impl Job {
    pub fn new<F>(name: &'static str, task: F) -> Self
    where
        F: std::future::Future<Output = Result<(), JobFailure>> + Send + 'static,
    {
        Self {
            name,
            task: Box::pin(task),
        }
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The bounded queue is at capacity. Submitters never block.
    #[error("job queue is full ({capacity} pending)")]
    Full { capacity: usize },

    #[error("job queue is shut down")]
    Closed,
}

pub trait JobQueue: Send + Sync {
    /// Enqueues without waiting.
    fn try_submit(&self, job: Job) -> Result<(), QueueError>;
}
