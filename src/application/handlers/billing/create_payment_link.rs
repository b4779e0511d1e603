//! CreatePaymentLinkHandler - Issues a gateway checkout link for one plan.

use std::sync::Arc;

use crate::domain::billing::{
    next_order_code, BillingError, Cart, CartItem, ExternalOrderId, GatewayKind, NewOrder,
};
use crate::domain::foundation::{AuthenticatedUser, OrderId, Timestamp};
use crate::ports::{OrderRepository, PaymentLinkRequest, PlanCatalog, UserAccountRepository};

use super::PaymentGateways;

/// Command to start a checkout.
#[derive(Debug, Clone)]
pub struct CreatePaymentLinkCommand {
    pub user: AuthenticatedUser,
    /// Gateway name as given in the request path.
    pub gateway: String,
    pub items: Vec<CartItem>,
}

/// Result of a successful checkout start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentLinkResult {
    pub order_id: OrderId,
    pub external_order_id: ExternalOrderId,
    pub checkout_url: String,
}

/// Handler for issuing payment links.
///
/// The order is written as PENDING before the gateway is called, so a
/// failed or timed out gateway call leaves an abandoned PENDING row and no
/// grant.
pub struct CreatePaymentLinkHandler {
    gateways: PaymentGateways,
    plans: Arc<dyn PlanCatalog>,
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserAccountRepository>,
}

impl CreatePaymentLinkHandler {
    pub fn new(
        gateways: PaymentGateways,
        plans: Arc<dyn PlanCatalog>,
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserAccountRepository>,
    ) -> Self {
        Self {
            gateways,
            plans,
            orders,
            users,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentLinkCommand,
    ) -> Result<CreatePaymentLinkResult, BillingError> {
        // 1. Resolve the gateway
        let kind: GatewayKind = cmd
            .gateway
            .parse()
            .map_err(|_| BillingError::UnsupportedGateway(cmd.gateway.clone()))?;
        let gateway = self
            .gateways
            .get(kind)
            .ok_or_else(|| BillingError::UnsupportedGateway(cmd.gateway.clone()))?;

        // 2. Validate the cart against the catalog
        let cart = Cart::parse(cmd.items)?;
        let plan = self
            .plans
            .find_by_name(cart.plan_name())
            .await?
            .ok_or_else(|| {
                BillingError::invalid_cart(format!("unknown subscription '{}'", cart.plan_name()))
            })?;

        let amount = plan.amount_minor_units();
        if let Some(claimed) = cart.client_amount_mismatch(&plan) {
            tracing::warn!(
                user_id = %cmd.user.id,
                plan = %plan.name,
                client_amount = claimed,
                server_amount = amount,
                "Client amount differs from catalog price; using catalog price"
            );
        }

        // 3. Refuse a second purchase of a plan that is still running
        let now = Timestamp::now();
        let state = self.users.subscription_state(cmd.user.id).await?;
        if state.map_or(false, |s| s.holds_plan_at(plan.id, now)) {
            return Err(BillingError::already_subscribed(&plan.name));
        }

        // 4. Record the PENDING order
        let order_code = next_order_code(now);
        let external_order_id = ExternalOrderId::from_order_code(order_code);
        let new_order = NewOrder::new(
            cmd.user.id,
            plan.id,
            kind,
            external_order_id.clone(),
            amount,
            gateway.currency(),
        )
        .map_err(|e| BillingError::infrastructure(e.to_string()))?;

        let order = self.orders.insert(new_order).await.map_err(|e| {
            tracing::error!(user_id = %cmd.user.id, error = %e, "Failed to create order");
            BillingError::infrastructure(e.to_string())
        })?;

        // 5. Ask the gateway for a checkout link
        let contact = self.users.find_contact(cmd.user.id).await?;
        let (buyer_name, buyer_email) = match contact {
            Some(c) => (
                join_name(c.first_name.as_deref(), c.last_name.as_deref()),
                c.email,
            ),
            None => (cmd.user.full_name(), cmd.user.email.clone()),
        };

        let request = PaymentLinkRequest {
            order_code,
            external_order_id: external_order_id.clone(),
            amount,
            currency: order.currency.clone(),
            plan_name: plan.name.clone(),
            buyer_name,
            buyer_email,
        };

        let link = gateway.create_payment_link(&request).await.map_err(|e| {
            tracing::warn!(
                order_id = %order.id,
                gateway = %kind,
                error = %e,
                retryable = e.is_retryable(),
                "Gateway failed to create payment link; order left pending"
            );
            BillingError::gateway_unavailable(kind, e.to_string())
        })?;

        tracing::info!(
            order_id = %order.id,
            order_code = %external_order_id,
            gateway = %kind,
            plan = %plan.name,
            amount,
            "Payment link created"
        );

        Ok(CreatePaymentLinkResult {
            order_id: order.id,
            external_order_id,
            checkout_url: link.checkout_url,
        })
    }
}

fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
