//! Shared harness for the integration tests.
//!
//! Builds the full service on in-memory adapters. PayOS is the real adapter
//! pointed at a local fake of the merchant API.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::{routing::post, Json, Router};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::sync::watch;
use tower::ServiceExt;

use birdlens_billing::adapters::auth::StaticSessionValidator;
use birdlens_billing::adapters::background::{WorkerPool, WorkerPoolConfig, WorkerPoolHandle};
use birdlens_billing::adapters::email::LoggingMailer;
use birdlens_billing::adapters::memory::{
    InMemoryNotificationRepository, InMemoryOrderRepository, InMemoryPlanCatalog,
    InMemoryPostCounter, InMemoryReferralRepository, InMemoryUserAccounts,
};
use birdlens_billing::adapters::payos::{PayOsConfig, PayOsGateway};
use birdlens_billing::app::{AppSettings, BillingApp, Ports};
use birdlens_billing::application::handlers::billing::PaymentGateways;
use birdlens_billing::domain::billing::SubscriptionPlan;
use birdlens_billing::domain::foundation::{AuthenticatedUser, PlanId, UserId};
use birdlens_billing::ports::UserContact;

pub const CHECKSUM_KEY: &str = "integration-checksum-key";
pub const TOKEN: &str = "token-ana";
pub const ANA: UserId = UserId::new(7);

pub fn checksum_key() -> SecretString {
    SecretString::new(CHECKSUM_KEY.to_string())
}

pub fn exbird() -> SubscriptionPlan {
    SubscriptionPlan {
        id: PlanId::new(1),
        name: "ExBird".to_string(),
        description: Some("Premium bird identification".to_string()),
        price: 200.0,
        duration_days: 30,
    }
}

pub struct TestApp {
    pub router: Router,
    pub app: BillingApp,
    pub orders: Arc<InMemoryOrderRepository>,
    pub users: Arc<InMemoryUserAccounts>,
    pub referrals: Arc<InMemoryReferralRepository>,
    pub posts: Arc<InMemoryPostCounter>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub shutdown: watch::Sender<bool>,
    pub workers: WorkerPoolHandle,
}

/// Fake PayOS merchant API answering every create call with a checkout URL.
async fn spawn_fake_payos() -> String {
    async fn create(Json(body): Json<Value>) -> Json<Value> {
        let code = body["orderCode"].as_i64().unwrap_or_default();
        Json(json!({
            "code": "00",
            "desc": "success",
            "data": {
                "checkoutUrl": format!("https://pay.payos.vn/web/{}", code),
                "paymentLinkId": format!("link-{}", code),
            }
        }))
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/v2/payment-requests", post(create));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_app() -> TestApp {
    let payos_url = spawn_fake_payos().await;
    let payos = PayOsGateway::new(
        PayOsConfig::new("client-id", SecretString::new("api-key".to_string()), checksum_key())
            .with_base_url(payos_url)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let orders = Arc::new(InMemoryOrderRepository::new());
    let users = Arc::new(InMemoryUserAccounts::new());
    let referrals = Arc::new(InMemoryReferralRepository::new());
    let posts = Arc::new(InMemoryPostCounter::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());

    users
        .add_user(UserContact {
            id: ANA,
            email: "ana@example.com".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Tran".to_string()),
        })
        .await;

    let sessions = StaticSessionValidator::new().with_user(
        TOKEN,
        AuthenticatedUser::new(ANA, "ana@example.com").with_name("Ana", "Tran"),
    );

    let ports = Ports {
        orders: orders.clone(),
        plans: Arc::new(InMemoryPlanCatalog::new(vec![exbird()])),
        users: users.clone(),
        referrals: referrals.clone(),
        posts: posts.clone(),
        notifications: notifications.clone(),
        sessions: Arc::new(sessions),
        mailer: Arc::new(LoggingMailer),
    };

    let (shutdown, shutdown_rx) = watch::channel(false);
    let (jobs, workers) = WorkerPool::start(
        WorkerPoolConfig::default().with_workers(2).with_queue_capacity(16),
        shutdown_rx,
    );

    let app = BillingApp::assemble(
        ports,
        PaymentGateways::new().with(Arc::new(payos)),
        Arc::new(jobs),
        AppSettings::default(),
    );

    TestApp {
        router: app.router.clone(),
        app,
        orders,
        users,
        referrals,
        posts,
        notifications,
        shutdown,
        workers,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    /// Stops the pool and waits for queued jobs to finish.
    pub async fn drain(self) {
        let _ = self.shutdown.send(true);
        self.workers.join().await;
    }
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
