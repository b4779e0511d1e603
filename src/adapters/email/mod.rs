//! Email delivery adapters.

mod logging;
mod resend;

pub use logging::LoggingMailer;
pub use resend::ResendMailer;
