//! Fixed-token session validator for tests and local development.
//!
//! # Example
//!
//! ```ignore
//! let validator = StaticSessionValidator::new()
//!     .with_user("valid-token", AuthenticatedUser::new(UserId::new(7), "ana@example.com"));
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Maps known tokens to users. Any other token is `InvalidToken`.
#[derive(Debug, Default, Clone)]
pub struct StaticSessionValidator {
    tokens: HashMap<String, AuthenticatedUser>,
    force_error: Option<AuthError>,
}

impl StaticSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }
}

#[async_trait]
impl SessionValidator for StaticSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}
