//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Ledger Ports
//!
//! - `OrderRepository` - Append-only order ledger with compare-and-set transitions
//! - `ReferralRepository` - Referral ledger
//! - `PlanCatalog` - Read-only subscription catalog
//! - `UserAccountRepository` - Contact details and subscription columns of users
//! - `NotificationRepository` - In-app notifications
//! - `PostCounter` - Post counts from the social feed
//!
//! ## Integration Ports
//!
//! - `PaymentGateway` - Checkout links and webhook authentication per processor
//! - `Mailer` - Outbound email delivery
//! - `JobQueue` - Detached background work
//! - `SessionValidator` - Access token validation

mod job_queue;
mod mailer;
mod notification_repository;
mod order_repository;
mod payment_gateway;
mod plan_catalog;
mod post_counter;
mod referral_repository;
mod session_validator;
mod user_account_repository;

pub use job_queue::{Job, JobFailure, JobQueue, QueueError};
pub use mailer::{EmailJob, MailError, Mailer};
pub use notification_repository::NotificationRepository;
pub use order_repository::OrderRepository;
pub use payment_gateway::{GatewayError, PaymentGateway, PaymentLink, PaymentLinkRequest};
pub use plan_catalog::PlanCatalog;
pub use post_counter::PostCounter;
pub use referral_repository::ReferralRepository;
pub use session_validator::SessionValidator;
pub use user_account_repository::{UserAccountRepository, UserContact};
