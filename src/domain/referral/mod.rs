//! Referral domain module.
//!
//! A referral links an inviting user to the user who registered with their
//! code. It completes once, when the invitee publishes a first post.

mod notification;
mod referral;

pub use notification::{NewNotification, Notification, REFERRAL_REWARD};
pub use referral::{qualifies_for_completion, Referral, ReferralStatus};
