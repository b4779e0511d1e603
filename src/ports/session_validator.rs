//! Session validation port for access tokens.
//!
//! Implementations must validate signature, issuer, audience and expiry, and
//! map the claims onto an `AuthenticatedUser`.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    ///
    /// * `Err(AuthError::InvalidToken)` - malformed, bad signature, wrong iss/aud
    /// * `Err(AuthError::TokenExpired)` - signature valid but expired
    /// * `Err(AuthError::ServiceUnavailable)` - key material unavailable
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
