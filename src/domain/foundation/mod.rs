//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait, the authenticated
//! principal and the error vocabulary shared by the billing and referral
//! domains.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{NotificationId, OrderId, PlanId, ReferralId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
