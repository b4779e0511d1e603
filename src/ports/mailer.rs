//! Outbound email port.

use async_trait::async_trait;
use thiserror::Error;

/// One message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJob {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("mail provider rejected message: {0}")]
    Rejected(String),

    #[error("mail provider unreachable: {0}")]
    Unavailable(String),
}

/// Delivers a single email. Retries, if any, belong to the implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError>;
}
