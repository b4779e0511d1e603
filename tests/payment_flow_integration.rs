//! End-to-end checkout and webhook reconciliation through the HTTP router.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use birdlens_billing::adapters::payos::sign_webhook_body;
use birdlens_billing::domain::billing::{ExternalOrderId, GatewayKind, NewOrder, OrderStatus};
use birdlens_billing::domain::foundation::{PlanId, Timestamp};
use birdlens_billing::ports::{OrderRepository, UserAccountRepository};

use common::{checksum_key, spawn_app, ANA, TOKEN};

fn paid_webhook(order_code: i64, amount: i64) -> Value {
    sign_webhook_body(
        &checksum_key(),
        "00",
        json!({
            "orderCode": order_code,
            "amount": amount,
            "description": "Birdlens ExBird Subscription",
            "accountNumber": "12345678",
            "reference": "FT2401",
            "transactionDateTime": "2024-06-01 10:00:00",
            "currency": "VND",
            "paymentLinkId": "link",
            "code": "00",
            "desc": "success",
        }),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn checkout_requires_authentication() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json(
            "/api/payments/payos/checkout",
            None,
            &json!({"items": [{"id": "ExBird"}]}),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert!(app.orders.all().await.is_empty());
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let app = spawn_app().await;
    let (status, _) = app.get("/api/me/subscription", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn checkout_records_pending_order_at_catalog_price() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json(
            "/api/payments/payos/checkout",
            Some(TOKEN),
            &json!({"items": [{"id": "ExBird", "amount": 123}]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let url = body["checkoutUrl"].as_str().unwrap();
    assert!(url.starts_with("https://pay.payos.vn/web/"));

    let orders = app.orders.all().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[0].amount, 20_000);
    assert_eq!(orders[0].currency, "VND");
    assert!(url.ends_with(orders[0].external_order_id.as_str()));
}

#[tokio::test]
async fn checkout_rejects_unknown_plan_and_gateway() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json(
            "/api/payments/payos/checkout",
            Some(TOKEN),
            &json!({"items": [{"id": "Platinum"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CART");

    let (status, body) = app
        .post_json(
            "/api/payments/paypal/checkout",
            Some(TOKEN),
            &json!({"items": [{"id": "ExBird"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_GATEWAY");

    let (status, _) = app
        .post_json("/api/payments/payos/checkout", Some(TOKEN), &json!({"items": []}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.orders.all().await.is_empty());
}

#[tokio::test]
async fn malformed_checkout_body_is_400() {
    let app = spawn_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/payments/payos/checkout")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CART");
}

// ════════════════════════════════════════════════════════════════════════════
// Webhook reconciliation
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn paid_webhook_settles_known_order_and_grants_plan() {
    let app = spawn_app().await;
    let order = app
        .orders
        .insert(
            NewOrder::new(
                ANA,
                PlanId::new(1),
                GatewayKind::PayOs,
                ExternalOrderId::from_order_code(171234),
                20_000,
                "VND",
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let before = Timestamp::now();
    let (status, body) = app
        .post_raw("/api/webhooks/payos", paid_webhook(171234, 20_000).to_string())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "settled");

    let stored = app.orders.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);

    let state = app.users.subscription_state(ANA).await.unwrap().unwrap();
    assert_eq!(state.subscription_id, Some(PlanId::new(1)));
    assert_eq!(state.status.as_deref(), Some("active"));
    let period_end = state.period_end.unwrap();
    assert!(period_end.as_unix_secs() >= before.add_days(30).unwrap().as_unix_secs());

    let (status, body) = app.get("/api/me/subscription", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription"], "ExBird");
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn redelivered_webhook_grants_once() {
    let app = spawn_app().await;
    app.post_json(
        "/api/payments/payos/checkout",
        Some(TOKEN),
        &json!({"items": [{"id": "ExBird"}]}),
    )
    .await;
    let order = app.orders.all().await.remove(0);
    let code = order.external_order_id.as_order_code().unwrap();
    let body = paid_webhook(code, order.amount).to_string();

    let (first, first_body) = app.post_raw("/api/webhooks/payos", body.clone()).await;
    let (second, second_body) = app.post_raw("/api/webhooks/payos", body).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(first_body["outcome"], "settled");
    assert_eq!(second_body["outcome"], "already_settled");
    assert_eq!(app.users.grants().await.len(), 1);

    // A second purchase of a running plan is refused
    let (status, body) = app
        .post_json(
            "/api/payments/payos/checkout",
            Some(TOKEN),
            &json!({"items": [{"id": "ExBird"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_SUBSCRIBED");
}

#[tokio::test]
async fn tampered_webhook_is_rejected_without_side_effects() {
    let app = spawn_app().await;
    app.orders
        .insert(
            NewOrder::new(
                ANA,
                PlanId::new(1),
                GatewayKind::PayOs,
                ExternalOrderId::from_order_code(171234),
                20_000,
                "VND",
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let mut body = paid_webhook(171234, 20_000);
    body["data"]["amount"] = json!(1);

    let (status, response) = app.post_raw("/api/webhooks/payos", body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["code"], "INVALID_SIGNATURE");
    assert_eq!(app.orders.all().await[0].status, OrderStatus::Pending);
    assert!(app.users.grants().await.is_empty());
}

#[tokio::test]
async fn non_json_webhook_is_400() {
    let app = spawn_app().await;
    let (status, _) = app.post_raw("/api/webhooks/payos", "definitely not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_for_unknown_order_is_acknowledged() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_raw("/api/webhooks/payos", paid_webhook(999_999, 20_000).to_string())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unknown_order");
    assert!(app.users.grants().await.is_empty());
}

#[tokio::test]
async fn stripe_webhook_without_stripe_configured_is_404() {
    let app = spawn_app().await;
    let (status, body) = app.post_raw("/api/webhooks/stripe", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNSUPPORTED_GATEWAY");
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog and health
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn catalog_is_public() {
    let app = spawn_app().await;
    let (status, body) = app.get("/api/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "ExBird");
    assert_eq!(body[0]["duration_days"], 30);
}

#[tokio::test]
async fn never_subscribed_user_reports_inactive() {
    let app = spawn_app().await;
    let (status, body) = app.get("/api/me/subscription", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["subscription"].is_null());
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn health_responds_ok() {
    let app = spawn_app().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
