//! Referral handlers.

mod complete_referral;
mod referral_trigger;

pub use complete_referral::{CompleteReferralCommand, CompleteReferralHandler, CompleteReferralOutcome};
pub use referral_trigger::ReferralTrigger;
