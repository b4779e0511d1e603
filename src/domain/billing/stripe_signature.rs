//! Stripe webhook signature verification.
//!
//! The `Stripe-Signature` header carries `t=<unix>,v1=<hex>[,v1=<hex>...]`.
//! Each `v1` is HMAC-SHA256 over `"{t}.{raw body}"` under the endpoint
//! secret. Several `v1` entries appear while a secret is being rolled.

use secrecy::{ExposeSecret, SecretString};

use super::signing::{constant_time_compare, hmac_sha256};
use super::WebhookError;

/// Default replay window (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses `t=<timestamp>,v1=<signature>[,...]`. Unknown keys are ignored.
    ///
    /// A header that cannot be parsed is treated as a forged signature.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or(WebhookError::InvalidSignature)?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| WebhookError::InvalidSignature)?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| WebhookError::InvalidSignature)?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(WebhookError::InvalidSignature)?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeSignatureVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl StripeSignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Checks the header against the raw body as of `now` (unix seconds).
    pub fn verify(&self, payload: &[u8], signature_header: &str, now: i64) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.validate_timestamp(header.timestamp, now)?;

        let expected = self.compute_signature(header.timestamp, payload);
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now - timestamp;
        if age > self.tolerance_secs || age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut signed = format!("{}.", timestamp).into_bytes();
        signed.extend_from_slice(payload);
        hmac_sha256(self.secret.expose_secret().as_bytes(), &signed)
    }
}

/// Builds a valid `Stripe-Signature` header for test fixtures.
#[cfg(test)]
pub fn compute_test_header(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed = format!("{}.{}", timestamp, payload);
    format!(
        "t={},v1={}",
        timestamp,
        super::signing::hmac_sha256_hex(secret.as_bytes(), signed.as_bytes())
    )
}
