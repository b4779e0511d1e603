//! ListPlansHandler - Query handler for the subscription catalog.

use std::sync::Arc;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::DomainError;
use crate::ports::PlanCatalog;

pub struct ListPlansHandler {
    plans: Arc<dyn PlanCatalog>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanCatalog>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        self.plans.list().await
    }
}
