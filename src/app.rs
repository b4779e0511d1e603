//! Composition root.
//!
//! Wires ports, gateways and the job queue into the HTTP router and the
//! referral trigger. `main` builds it from Postgres adapters; the
//! integration tests build it from the in-memory ones.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::adapters::http::{app_router, BillingAppState};
use crate::application::handlers::billing::{GrantSubscriptionHandler, PaymentGateways};
use crate::application::handlers::email::EmailDispatcher;
use crate::application::handlers::referral::{CompleteReferralHandler, ReferralTrigger};
use crate::ports::{
    JobQueue, Mailer, NotificationRepository, OrderRepository, PlanCatalog, PostCounter,
    ReferralRepository, SessionValidator, UserAccountRepository,
};

/// Storage and integration ports the service runs on.
#[derive(Clone)]
pub struct Ports {
    pub orders: Arc<dyn OrderRepository>,
    pub plans: Arc<dyn PlanCatalog>,
    pub users: Arc<dyn UserAccountRepository>,
    pub referrals: Arc<dyn ReferralRepository>,
    pub posts: Arc<dyn PostCounter>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub sessions: Arc<dyn SessionValidator>,
    pub mailer: Arc<dyn Mailer>,
}

/// Runtime knobs that are not port implementations.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Plan granted to referrers.
    pub reward_plan: String,
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
    /// Send a receipt email after each settled payment.
    pub send_receipts: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            reward_plan: "ExBird".to_string(),
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 64 * 1024,
            send_receipts: true,
        }
    }
}

/// The assembled service.
pub struct BillingApp {
    pub router: Router,
    /// Called by the post service after a post is persisted.
    pub referral_trigger: ReferralTrigger,
}

impl BillingApp {
    pub fn assemble(
        ports: Ports,
        gateways: PaymentGateways,
        jobs: Arc<dyn JobQueue>,
        settings: AppSettings,
    ) -> Self {
        tracing::info!(gateways = ?gateways.enabled(), "Assembling billing service");

        let emails = settings
            .send_receipts
            .then(|| EmailDispatcher::new(ports.mailer.clone(), jobs.clone()));

        let state = BillingAppState {
            gateways,
            orders: ports.orders.clone(),
            plans: ports.plans.clone(),
            users: ports.users.clone(),
            emails,
        };
        let router = app_router(
            state,
            ports.sessions.clone(),
            settings.request_timeout,
            settings.body_limit_bytes,
        );

        let grants = Arc::new(GrantSubscriptionHandler::new(
            ports.plans.clone(),
            ports.users.clone(),
        ));
        let referrals = Arc::new(CompleteReferralHandler::new(
            ports.posts.clone(),
            ports.referrals.clone(),
            ports.plans.clone(),
            grants,
            ports.notifications.clone(),
            settings.reward_plan,
        ));
        let referral_trigger = ReferralTrigger::new(referrals, jobs);

        Self {
            router,
            referral_trigger,
        }
    }
}
