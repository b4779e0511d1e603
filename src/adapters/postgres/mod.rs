//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Every query runs under a 5 second timeout. A timeout surfaces as a
//! retryable `Timeout` error so webhook callers answer 5xx and the gateway
//! redelivers.
//!
//! - `PostgresOrderRepository` - Order ledger with compare-and-set transitions
//! - `PostgresPlanCatalog` - The `subscriptions` table
//! - `PostgresUserAccounts` - Billing columns of `users`
//! - `PostgresReferralRepository` / `PostgresPostCounter` - Referral flow
//! - `PostgresNotificationRepository` - In-app notifications

mod notification_repository;
mod order_repository;
mod plan_catalog;
mod query;
mod referral_repository;
mod user_accounts;

pub use notification_repository::PostgresNotificationRepository;
pub use order_repository::PostgresOrderRepository;
pub use plan_catalog::PostgresPlanCatalog;
pub use query::QUERY_TIMEOUT;
pub use referral_repository::{PostgresPostCounter, PostgresReferralRepository};
pub use user_accounts::PostgresUserAccounts;
