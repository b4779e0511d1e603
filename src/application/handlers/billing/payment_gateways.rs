//! Registry of configured payment gateways.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::billing::GatewayKind;
use crate::ports::PaymentGateway;

/// Gateways enabled on this deployment, keyed by kind.
#[derive(Clone, Default)]
pub struct PaymentGateways {
    gateways: HashMap<GatewayKind, Arc<dyn PaymentGateway>>,
}

impl PaymentGateways {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateways.insert(gateway.kind(), gateway);
        self
    }

    pub fn get(&self, kind: GatewayKind) -> Option<Arc<dyn PaymentGateway>> {
        self.gateways.get(&kind).cloned()
    }

    pub fn enabled(&self) -> Vec<GatewayKind> {
        GatewayKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.gateways.contains_key(kind))
            .collect()
    }
}

impl std::fmt::Debug for PaymentGateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGateways")
            .field("enabled", &self.enabled())
            .finish()
    }
}
