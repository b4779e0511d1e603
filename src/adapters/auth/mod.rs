//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 access tokens from the account service
//! - `static_validator` - Fixed tokens for tests and local development

mod jwt;
mod static_validator;

pub use jwt::{AccessClaims, JwtConfig, JwtSessionValidator};
pub use static_validator::StaticSessionValidator;
