//! Payment gateway identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Third-party processor an order was placed with.
///
/// Stored in the `orders.gateway` column as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// PayOS bank-transfer checkout (VietQR).
    PayOs,
    /// Stripe hosted checkout.
    Stripe,
}

impl GatewayKind {
    pub const ALL: [GatewayKind; 2] = [GatewayKind::PayOs, GatewayKind::Stripe];

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayKind::PayOs => "payos",
            GatewayKind::Stripe => "stripe",
        }
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payos" => Ok(GatewayKind::PayOs),
            "stripe" => Ok(GatewayKind::Stripe),
            other => Err(ValidationError::invalid_format(
                "gateway",
                format!("unknown payment gateway '{}'", other),
            )),
        }
    }
}
