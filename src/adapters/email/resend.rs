//! Resend HTTP mailer.
//!
//! Retries transient failures (network errors, 5xx, 429) with a short
//! backoff. Other 4xx answers fail immediately.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{EmailJob, MailError, Mailer};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Delays before the second and third attempts.
const RETRY_DELAYS: &[Duration] = &[Duration::from_millis(500), Duration::from_secs(2)];

#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

pub struct ResendMailer {
    api_key: SecretString,
    from: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Result<Self, MailError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MailError::Unavailable(e.to_string()))?;
        Ok(Self {
            api_key,
            from: from.into(),
            api_url: RESEND_API_URL.to_string(),
            http_client,
        })
    }

    /// Set a custom API URL (for testing).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// One attempt. The flag says whether a retry may help.
    async fn send_once(&self, job: &EmailJob) -> Result<(), (MailError, bool)> {
        let request = ResendEmailRequest {
            from: &self.from,
            to: [job.recipient.as_str()],
            subject: &job.subject,
            html: &job.html_body,
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| (MailError::Unavailable(e.to_string()), true))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let transient = status.is_server_error() || status.as_u16() == 429;
        let error = if transient {
            MailError::Unavailable(format!("HTTP {}", status.as_u16()))
        } else {
            MailError::Rejected(format!("HTTP {}: {}", status.as_u16(), body))
        };
        Err((error, transient))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, job: &EmailJob) -> Result<(), MailError> {
        let mut attempt = 0;
        loop {
            match self.send_once(job).await {
                Ok(()) => {
                    tracing::info!(to = %job.recipient, attempt, "Email sent via Resend");
                    return Ok(());
                }
                Err((error, true)) if attempt < RETRY_DELAYS.len() => {
                    tracing::warn!(to = %job.recipient, attempt, error = %error, "Retrying email send");
                    tokio::time::sleep(RETRY_DELAYS[attempt]).await;
                    attempt += 1;
                }
                Err((error, _)) => {
                    tracing::error!(to = %job.recipient, attempt, error = %error, "Email send failed");
                    return Err(error);
                }
            }
        }
    }
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("from", &self.from)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
