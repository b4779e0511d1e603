//! Mailer that only logs. Used when no Resend key is configured.

use async_trait::async_trait;

use crate::ports::{EmailJob, MailError, Mailer};

#[derive(Debug, Default, Clone)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError> {
        tracing::info!(to = %job.recipient, subject = %job.subject, "Email delivery disabled; message logged only");
        Ok(())
    }
}
