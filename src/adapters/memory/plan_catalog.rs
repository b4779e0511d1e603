//! In-memory subscription catalog.

use async_trait::async_trait;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::PlanCatalog;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanCatalog {
    plans: Vec<SubscriptionPlan>,
}

impl InMemoryPlanCatalog {
    pub fn new(plans: Vec<SubscriptionPlan>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl PlanCatalog for InMemoryPlanCatalog {
    async fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.matches_item(name)).cloned())
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let mut plans = self.plans.clone();
        plans.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(plans)
    }
}
