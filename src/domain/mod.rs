//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, errors, state machine)
//! - `billing` - Order ledger, catalog, subscription grants, webhook verification
//! - `referral` - Referral ledger and reward notifications

pub mod billing;
pub mod foundation;
pub mod referral;
