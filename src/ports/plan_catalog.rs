//! Subscription catalog port (read-only).

use async_trait::async_trait;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, PlanId};

#[async_trait]
pub trait PlanCatalog: Send + Sync {
    /// Case-insensitive lookup by plan name.
    async fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionPlan>, DomainError>;

    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;

    /// All plans, cheapest first.
    async fn list(&self) -> Result<Vec<SubscriptionPlan>, DomainError>;
}
