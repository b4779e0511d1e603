//! EmailDispatcher - Hands outbound email to the background pool.
//!
//! Sending is always best effort. A full queue or a failed delivery is
//! logged and never surfaces to the request that caused the email.

use std::sync::Arc;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::Timestamp;
use crate::ports::{EmailJob, Job, JobFailure, JobQueue, Mailer};

/// Submits email jobs to a [`JobQueue`] for delivery through a [`Mailer`].
#[derive(Clone)]
pub struct EmailDispatcher {
    mailer: Arc<dyn Mailer>,
    jobs: Arc<dyn JobQueue>,
}

impl EmailDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, jobs: Arc<dyn JobQueue>) -> Self {
        Self { mailer, jobs }
    }

    /// Returns `true` if the email was queued.
    pub fn dispatch(&self, email: EmailJob) -> bool {
        let mailer = self.mailer.clone();
        let recipient = email.recipient.clone();
        let job = Job::new("send_email", async move {
            mailer.send(&email).await.map_err(JobFailure::from)
        });

        match self.jobs.try_submit(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(recipient = %recipient, error = %e, "Email not queued");
                false
            }
        }
    }
}

/// Payment confirmation sent after a plan is granted.
pub fn payment_receipt(
    recipient: &str,
    plan: &SubscriptionPlan,
    amount: i64,
    currency: &str,
    period_end: Timestamp,
) -> EmailJob {
    EmailJob {
        recipient: recipient.to_string(),
        subject: format!("Your Birdlens {} subscription is active", plan.name),
        html_body: format!(
            "<p>Thank you for your purchase!</p>\
             <p>Plan: <strong>{}</strong><br>Amount: {} {}<br>Active until: {}</p>",
            plan.name,
            format_amount(amount, currency),
            currency,
            period_end.as_datetime().format("%Y-%m-%d"),
        ),
    }
}

/// VND has no minor unit in practice; everything else shows two decimals.
fn format_amount(amount: i64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("VND") {
        (amount / 100).to_string()
    } else {
        format!("{}.{:02}", amount / 100, amount % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;
    use crate::ports::{MailError, QueueError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailJob>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, job: &EmailJob) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(job.clone());
            Ok(())
        }
    }

    /// Runs jobs to completion on submit, or rejects everything when full.
    struct InlineQueue {
        full: bool,
        pending: Mutex<Vec<Job>>,
    }

    impl JobQueue for InlineQueue {
        fn try_submit(&self, job: Job) -> Result<(), QueueError> {
            if self.full {
                return Err(QueueError::Full { capacity: 0 });
            }
            self.pending.lock().unwrap().push(job);
            Ok(())
        }
    }

    impl InlineQueue {
        async fn drain(&self) {
            let jobs: Vec<Job> = self.pending.lock().unwrap().drain(..).collect();
            for job in jobs {
                job.task.await.unwrap();
            }
        }
    }

    fn plan() -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(1),
            name: "ExBird".to_string(),
            description: None,
            price: 200.0,
            duration_days: 30,
        }
    }

    #[tokio::test]
    async fn queued_email_is_delivered_by_the_job() {
        let mailer = Arc::new(RecordingMailer::default());
        let queue = Arc::new(InlineQueue {
            full: false,
            pending: Mutex::new(Vec::new()),
        });
        let dispatcher = EmailDispatcher::new(mailer.clone(), queue.clone());

        let receipt = payment_receipt("ana@example.com", &plan(), 20000, "VND", Timestamp::now());
        assert!(dispatcher.dispatch(receipt.clone()));
        assert!(mailer.sent.lock().unwrap().is_empty());

        queue.drain().await;
        assert_eq!(mailer.sent.lock().unwrap().as_slice(), &[receipt]);
    }

    #[tokio::test]
    async fn full_queue_drops_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let queue = Arc::new(InlineQueue {
            full: true,
            pending: Mutex::new(Vec::new()),
        });
        let dispatcher = EmailDispatcher::new(mailer, queue);

        let receipt = payment_receipt("ana@example.com", &plan(), 499, "EUR", Timestamp::now());
        assert!(!dispatcher.dispatch(receipt));
    }

    #[test]
    fn receipt_formats_amount_per_currency() {
        let now = Timestamp::now();
        assert!(payment_receipt("a@b.c", &plan(), 20000, "VND", now)
            .html_body
            .contains("200 VND"));
        assert!(payment_receipt("a@b.c", &plan(), 499, "EUR", now)
            .html_body
            .contains("4.99 EUR"));
    }
}
