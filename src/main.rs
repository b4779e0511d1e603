use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use birdlens_billing::adapters::auth::{JwtConfig, JwtSessionValidator};
use birdlens_billing::adapters::background::{WorkerPool, WorkerPoolConfig};
use birdlens_billing::adapters::email::{LoggingMailer, ResendMailer};
use birdlens_billing::adapters::payos::{PayOsConfig, PayOsGateway};
use birdlens_billing::adapters::postgres::{
    PostgresNotificationRepository, PostgresOrderRepository, PostgresPlanCatalog,
    PostgresPostCounter, PostgresReferralRepository, PostgresUserAccounts,
};
use birdlens_billing::adapters::stripe::{StripeConfig, StripeGateway};
use birdlens_billing::app::{AppSettings, BillingApp, Ports};
use birdlens_billing::application::handlers::billing::PaymentGateways;
use birdlens_billing::config::{AppConfig, PaymentConfig};
use birdlens_billing::ports::Mailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "Starting Birdlens billing service"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let gateways = build_gateways(&config.payment, config.is_production())?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (jobs, workers) = WorkerPool::start(
        WorkerPoolConfig::default()
            .with_workers(config.workers.count)
            .with_queue_capacity(config.workers.queue_capacity),
        shutdown_rx,
    );

    let mailer: Arc<dyn Mailer> = match &config.email.resend_api_key {
        Some(key) if config.email.delivery_enabled() => {
            Arc::new(ResendMailer::new(key.clone(), config.email.from_header())?)
        }
        _ => {
            tracing::warn!("No Resend API key configured; emails will only be logged");
            Arc::new(LoggingMailer)
        }
    };

    let sessions = JwtSessionValidator::new(&JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        issuer: config.auth.jwt_issuer.clone(),
        audience: config.auth.jwt_audience.clone(),
    });

    let ports = Ports {
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        plans: Arc::new(PostgresPlanCatalog::new(pool.clone())),
        users: Arc::new(PostgresUserAccounts::new(pool.clone())),
        referrals: Arc::new(PostgresReferralRepository::new(pool.clone())),
        posts: Arc::new(PostgresPostCounter::new(pool.clone())),
        notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
        sessions: Arc::new(sessions),
        mailer,
    };

    let app = BillingApp::assemble(
        ports,
        gateways,
        Arc::new(jobs),
        AppSettings {
            reward_plan: config.referral.reward_plan.clone(),
            request_timeout: config.server.request_timeout(),
            body_limit_bytes: config.server.body_limit_bytes,
            send_receipts: true,
        },
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drop the last submitter before draining so queued jobs finish.
    drop(app.referral_trigger);
    let _ = shutdown_tx.send(true);
    workers.join().await;
    pool.close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn build_gateways(
    payment: &PaymentConfig,
    production: bool,
) -> Result<PaymentGateways, Box<dyn std::error::Error>> {
    let payos = &payment.payos;
    let payos = PayOsGateway::new(
        PayOsConfig::new(
            payos.client_id.clone(),
            payos.api_key.clone(),
            payos.checksum_key.clone(),
        )
        .with_base_url(payos.api_url.clone())
        .with_redirect_urls(payos.return_url.clone(), payos.cancel_url.clone())
        .with_link_expiry_minutes(payos.link_expiry_minutes)
        .with_timeout(payment.gateway_timeout()),
    )?;
    let mut gateways = PaymentGateways::new().with(Arc::new(payos));

    if let Some(stripe) = &payment.stripe {
        if production && stripe.is_test_mode() {
            tracing::warn!("Stripe test key configured in production");
        }
        let gateway = StripeGateway::new(
            StripeConfig::new(stripe.secret_key.clone(), stripe.webhook_secret.clone())
                .with_redirect_urls(stripe.success_url.clone(), stripe.cancel_url.clone())
                .with_currency(stripe.currency.clone())
                .with_timeout(payment.gateway_timeout())
                .with_require_livemode(production && !stripe.is_test_mode()),
        )?;
        gateways = gateways.with(Arc::new(gateway));
    }

    tracing::info!(enabled = ?gateways.enabled(), "Payment gateways configured");
    Ok(gateways)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
