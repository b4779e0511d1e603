//! Email handlers.

mod email_dispatcher;

pub use email_dispatcher::{payment_receipt, EmailDispatcher};
