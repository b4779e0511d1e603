//! In-memory adapters for every storage port.
//!
//! Back the handler and HTTP test suites. State lives in the process, so
//! these are not suitable for multi-instance deployments.

mod notification_repository;
mod order_repository;
mod plan_catalog;
mod referral_repository;
mod user_accounts;

pub use notification_repository::InMemoryNotificationRepository;
pub use order_repository::InMemoryOrderRepository;
pub use plan_catalog::InMemoryPlanCatalog;
pub use referral_repository::{InMemoryPostCounter, InMemoryReferralRepository};
pub use user_accounts::InMemoryUserAccounts;
