//! Checkout cart validation.
//!
//! Clients send item ids and, optionally, the amount they believe they are
//! paying. Only the id is trusted; the price always comes from the catalog.

use serde::Deserialize;

use super::{BillingError, SubscriptionPlan};

/// One line of a client-submitted cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartItem {
    pub id: String,
    /// Client-side price in minor units. Logged on mismatch, never charged.
    #[serde(default)]
    pub amount: Option<i64>,
}

/// A cart that has passed shape validation: exactly one plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    item: CartItem,
}

impl Cart {
    /// Checks the cart shape. A purchase covers exactly one plan.
    pub fn parse(items: Vec<CartItem>) -> Result<Self, BillingError> {
        let mut items = items.into_iter();
        let item = items
            .next()
            .ok_or_else(|| BillingError::invalid_cart("cart is empty"))?;
        if items.next().is_some() {
            return Err(BillingError::invalid_cart(
                "only one subscription can be purchased per order",
            ));
        }
        if item.id.trim().is_empty() {
            return Err(BillingError::invalid_cart("item id is required"));
        }
        Ok(Self { item })
    }

    /// Catalog name the client asked for.
    pub fn plan_name(&self) -> &str {
        self.item.id.trim()
    }

    /// Client-submitted amount when it disagrees with the catalog price.
    pub fn client_amount_mismatch(&self, plan: &SubscriptionPlan) -> Option<i64> {
        self.item
            .amount
            .filter(|&claimed| claimed != plan.amount_minor_units())
    }
}
