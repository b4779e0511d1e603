//! Referral rewards scheduled through the assembled service.

mod common;

use birdlens_billing::domain::foundation::{PlanId, UserId};
use birdlens_billing::domain::referral::ReferralStatus;
use birdlens_billing::ports::{UserAccountRepository, UserContact};

use common::{eventually, spawn_app, ANA};

const BOB: UserId = UserId::new(8);

async fn register_bob(app: &common::TestApp) {
    app.users
        .add_user(UserContact {
            id: BOB,
            email: "bob@example.com".to_string(),
            first_name: None,
            last_name: None,
        })
        .await;
    app.referrals.add_pending(1, ANA, BOB, "ANA-2024").await;
}

#[tokio::test]
async fn first_post_rewards_referrer_once() {
    let app = spawn_app().await;
    register_bob(&app).await;

    app.posts.record_post(BOB).await;
    // Duplicate trigger for the same post, as a retrying client would cause
    assert!(app.app.referral_trigger.on_post_created(BOB));
    assert!(app.app.referral_trigger.on_post_created(BOB));

    let referrals = app.referrals.clone();
    let completed = eventually(|| {
        let referrals = referrals.clone();
        async move { referrals.all().await[0].status == ReferralStatus::Completed }
    })
    .await;
    assert!(completed, "referral never completed");

    let notifications = app.notifications.clone();
    assert!(eventually(|| {
        let notifications = notifications.clone();
        async move { !notifications.all().await.is_empty() }
    })
    .await);

    let users = app.users.clone();
    let notifications = app.notifications.clone();
    app.drain().await;

    let grants = users.grants().await;
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].0, ANA);

    let state = users.subscription_state(ANA).await.unwrap().unwrap();
    assert_eq!(state.subscription_id, Some(PlanId::new(1)));

    let sent = notifications.all().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_id, ANA);
}

#[tokio::test]
async fn later_posts_do_not_reward() {
    let app = spawn_app().await;
    register_bob(&app).await;

    app.posts.record_post(BOB).await;
    app.posts.record_post(BOB).await;
    assert!(app.app.referral_trigger.on_post_created(BOB));

    let users = app.users.clone();
    let referrals = app.referrals.clone();
    app.drain().await;

    assert!(users.grants().await.is_empty());
    assert_eq!(referrals.all().await[0].status, ReferralStatus::Pending);
}

#[tokio::test]
async fn post_without_referral_is_a_no_op() {
    let app = spawn_app().await;

    app.posts.record_post(ANA).await;
    assert!(app.app.referral_trigger.on_post_created(ANA));

    let users = app.users.clone();
    app.drain().await;

    assert!(users.grants().await.is_empty());
}
