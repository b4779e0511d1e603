//! HandleGatewayWebhookHandler - Reconciles verified gateway callbacks with the order ledger.
//!
//! # Delivery guarantees
//!
//! Gateways deliver at least once and retry on any non-2xx answer. Every
//! outcome that should stop retries is therefore `Ok`, including unknown
//! orders, redeliveries and grant failures after the order was settled.
//! Only authentication, malformed bodies and database failures are `Err`.

use std::sync::Arc;

use crate::domain::billing::{
    ExternalOrderId, GatewayKind, Order, OrderStatus, PaymentEvent, WebhookError, WebhookOutcome,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{OrderRepository, PlanCatalog, UserAccountRepository};

use super::{GrantSubscriptionHandler, PaymentGateways};
use crate::application::handlers::email::{payment_receipt, EmailDispatcher};

/// Command carrying one raw webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleGatewayWebhookCommand {
    pub gateway: GatewayKind,
    /// Body bytes exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, for gateways that sign out of band.
    pub signature_header: Option<String>,
}

/// Handler for gateway webhooks.
pub struct HandleGatewayWebhookHandler {
    gateways: PaymentGateways,
    orders: Arc<dyn OrderRepository>,
    plans: Arc<dyn PlanCatalog>,
    users: Arc<dyn UserAccountRepository>,
    grants: Arc<GrantSubscriptionHandler>,
    emails: Option<EmailDispatcher>,
}

impl HandleGatewayWebhookHandler {
    pub fn new(
        gateways: PaymentGateways,
        orders: Arc<dyn OrderRepository>,
        plans: Arc<dyn PlanCatalog>,
        users: Arc<dyn UserAccountRepository>,
        grants: Arc<GrantSubscriptionHandler>,
    ) -> Self {
        Self {
            gateways,
            orders,
            plans,
            users,
            grants,
            emails: None,
        }
    }

    /// Send a receipt after each successful grant.
    pub fn with_receipts(mut self, emails: EmailDispatcher) -> Self {
        self.emails = Some(emails);
        self
    }

    pub async fn handle(
        &self,
        cmd: HandleGatewayWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let gateway = self
            .gateways
            .get(cmd.gateway)
            .ok_or_else(|| WebhookError::GatewayNotConfigured(cmd.gateway.to_string()))?;

        // 1. Structural check on the raw body
        serde_json::from_slice::<serde::de::IgnoredAny>(&cmd.payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        // 2. Authenticate before touching the ledger
        let event = gateway
            .verify_webhook(&cmd.payload, cmd.signature_header.as_deref())
            .map_err(|e| {
                if e.is_authentication_failure() {
                    tracing::warn!(
                        security_event = true,
                        gateway = %cmd.gateway,
                        error = %e,
                        "Webhook signature verification failed"
                    );
                } else {
                    tracing::warn!(gateway = %cmd.gateway, error = %e, "Rejected webhook payload");
                }
                e
            })?;

        // 3. Apply to the ledger
        match event {
            PaymentEvent::Paid {
                external_order_id,
                amount,
            } => self.settle(cmd.gateway, external_order_id, amount).await,
            PaymentEvent::Failed { external_order_id } => {
                self.close(cmd.gateway, external_order_id, OrderStatus::Failed)
                    .await
            }
            PaymentEvent::Cancelled { external_order_id } => {
                self.close(cmd.gateway, external_order_id, OrderStatus::Cancelled)
                    .await
            }
            PaymentEvent::NotPaid { code, description } => {
                tracing::info!(
                    gateway = %cmd.gateway,
                    code = %code,
                    description = %description,
                    "Webhook reports no payment; acknowledged"
                );
                Ok(WebhookOutcome::NotPaid { code })
            }
            PaymentEvent::Ignored { event_type } => {
                tracing::debug!(gateway = %cmd.gateway, event_type = %event_type, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }

    async fn find_order(
        &self,
        gateway: GatewayKind,
        external_order_id: &ExternalOrderId,
    ) -> Result<Option<Order>, WebhookError> {
        let order = self
            .orders
            .find_by_external_id(gateway, external_order_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    gateway = %gateway,
                    order_code = %external_order_id,
                    error = %e,
                    "Order lookup failed; gateway will retry"
                );
                WebhookError::from(e)
            })?;

        if order.is_none() {
            tracing::info!(
                gateway = %gateway,
                order_code = %external_order_id,
                "Webhook for unknown order; acknowledged"
            );
        }
        Ok(order)
    }

    async fn transition(&self, order: &Order, to: OrderStatus) -> Result<bool, WebhookError> {
        self.orders
            .transition_status(order.id, OrderStatus::Pending, to)
            .await
            .map_err(|e| {
                tracing::error!(order_id = %order.id, to = %to, error = %e, "Order transition failed");
                WebhookError::from(e)
            })
    }

    /// Re-reads the status after a lost compare-and-set.
    ///
    /// A failed read is a retryable error; the redelivery sees the settled row.
    async fn current_status(&self, order: &Order) -> Result<OrderStatus, WebhookError> {
        match self.orders.find_by_id(order.id).await {
            Ok(Some(current)) => Ok(current.status),
            Ok(None) => {
                tracing::warn!(order_id = %order.id, "Order vanished after lost transition");
                Ok(order.status)
            }
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Order re-read failed; gateway will retry");
                Err(WebhookError::from(e))
            }
        }
    }

    async fn settle(
        &self,
        gateway: GatewayKind,
        external_order_id: ExternalOrderId,
        paid_amount: Option<i64>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(order) = self.find_order(gateway, &external_order_id).await? else {
            return Ok(WebhookOutcome::UnknownOrder { external_order_id });
        };

        if !order.is_pending() {
            tracing::warn!(
                order_id = %order.id,
                status = %order.status,
                "Duplicate webhook delivery for settled order"
            );
            return Ok(WebhookOutcome::AlreadySettled {
                order_id: order.id,
                status: order.status,
            });
        }

        if let Some(paid) = paid_amount.filter(|&paid| paid != order.amount) {
            tracing::error!(
                critical = true,
                order_id = %order.id,
                expected = order.amount,
                paid,
                "Paid amount differs from order amount"
            );
        }

        if !self.transition(&order, OrderStatus::Paid).await? {
            let status = self.current_status(&order).await?;
            tracing::warn!(order_id = %order.id, status = %status, "Duplicate webhook delivery lost settle race");
            return Ok(WebhookOutcome::AlreadySettled {
                order_id: order.id,
                status,
            });
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            gateway = %gateway,
            "Order paid"
        );

        match self.grant(&order).await {
            Ok(()) => Ok(WebhookOutcome::Settled {
                order_id: order.id,
                user_id: order.user_id,
            }),
            Err(e) => {
                tracing::error!(
                    critical = true,
                    order_id = %order.id,
                    user_id = %order.user_id,
                    plan_id = %order.plan_id,
                    code = %e.code,
                    error = %e,
                    "Order is PAID but the subscription grant failed"
                );
                Ok(WebhookOutcome::SettledGrantFailed {
                    order_id: order.id,
                    user_id: order.user_id,
                })
            }
        }
    }

    async fn grant(&self, order: &Order) -> Result<(), DomainError> {
        let plan = self.plans.find_by_id(order.plan_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::PlanNotFound,
                format!("Subscription plan {} not found", order.plan_id),
            )
        })?;

        let grant = self.grants.grant(order.user_id, &plan).await?;

        if let Some(emails) = &self.emails {
            match self.users.find_contact(order.user_id).await {
                Ok(Some(contact)) => {
                    emails.dispatch(payment_receipt(
                        &contact.email,
                        &plan,
                        order.amount,
                        &order.currency,
                        grant.period_end,
                    ));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(user_id = %order.user_id, error = %e, "Receipt skipped");
                }
            }
        }
        Ok(())
    }

    async fn close(
        &self,
        gateway: GatewayKind,
        external_order_id: ExternalOrderId,
        target: OrderStatus,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(order) = self.find_order(gateway, &external_order_id).await? else {
            return Ok(WebhookOutcome::UnknownOrder { external_order_id });
        };

        let closed = order.is_pending() && self.transition(&order, target).await?;
        if !closed {
            let status = self.current_status(&order).await?;
            tracing::info!(
                order_id = %order.id,
                status = %status,
                requested = %target,
                "Order already closed; ignoring"
            );
            return Ok(WebhookOutcome::AlreadySettled {
                order_id: order.id,
                status,
            });
        }

        tracing::info!(order_id = %order.id, status = %target, "Order closed without payment");
        Ok(WebhookOutcome::Closed {
            order_id: order.id,
            status: target,
        })
    }
}
