//! End-to-end account flows: signup, verification, login, profile and the
//! admin view override.

#[allow(dead_code, reason = "each suite uses a subset of the shared harness")]
mod support;

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use step_challenge::domain::UserId;
use support::{ADMIN, Client, Harness, PASSWORD, TEST_USER};

const NEWCOMER: &str = "john.doe@dhs.lacounty.gov";

fn signup_form(email: &str) -> serde_json::Value {
    json!({
        "name": "John Doe",
        "email": email,
        "password": "walking-2026",
        "departmentId": "sales",
    })
}

#[rstest]
#[actix_web::test]
async fn newcomer_signs_up_verifies_and_logs_steps() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut anonymous = Client::default();

    let reply = anonymous
        .post(&app, "/api/v1/signup", signup_form(NEWCOMER))
        .await;
    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert_eq!(reply.body["email"], NEWCOMER);

    let blocked = anonymous
        .post(
            &app,
            "/api/v1/login",
            json!({ "email": NEWCOMER, "password": "walking-2026" }),
        )
        .await;
    assert_eq!(blocked.status, StatusCode::UNAUTHORIZED);

    let code = harness.code_for(NEWCOMER);
    let verified = anonymous
        .post(
            &app,
            "/api/v1/verify-email",
            json!({ "email": NEWCOMER, "code": code.as_ref() }),
        )
        .await;
    assert_eq!(verified.status, StatusCode::CREATED);
    assert_eq!(verified.body["role"], "user");
    assert_eq!(verified.body["departmentId"], "sales");

    let mut john = Client::login(&app, NEWCOMER, "walking-2026").await;
    let first = john
        .put(&app, "/api/v1/users/me/steps", json!({ "steps": 4_000 }))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let second = john
        .put(&app, "/api/v1/users/me/steps", json!({ "steps": 6_500 }))
        .await;
    assert_eq!(second.body["steps"]["daily"], 6_500);
    assert_eq!(second.body["steps"]["weekly"], 6_500);
    assert_eq!(second.body["steps"]["total"], 6_500);

    let dashboard = john.get(&app, "/api/v1/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["steps"]["daily"], 6_500);
    assert_eq!(dashboard.body["department"]["department"]["id"], "sales");
}

#[rstest]
#[actix_web::test]
async fn foreign_domains_never_reach_verification() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;

    let reply = Client::default()
        .post(&app, "/api/v1/signup", signup_form("john.doe@gmail.com"))
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(
        !harness
            .store
            .has_pending(&UserId::new("john.doe@gmail.com").expect("email"))
    );
}

#[rstest]
#[actix_web::test]
async fn expired_codes_are_discarded() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut anonymous = Client::default();
    anonymous
        .post(&app, "/api/v1/signup", signup_form(NEWCOMER))
        .await;
    let code = harness.code_for(NEWCOMER);

    harness.clock.advance_seconds(301);
    let reply = anonymous
        .post(
            &app,
            "/api/v1/verify-email",
            json!({ "email": NEWCOMER, "code": code.as_ref() }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["message"], "Verification code expired.");
    assert!(
        !harness
            .store
            .has_pending(&UserId::new(NEWCOMER).expect("email"))
    );
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut brianna = Client::login(&app, TEST_USER, PASSWORD).await;

    let reply = brianna.post(&app, "/api/v1/logout", json!({})).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(!brianna.has_session());

    let after = brianna.get(&app, "/api/v1/users/me").await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn deleted_users_lose_their_session() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut victim = Client::login(&app, "charlie.brown@dhs.lacounty.gov", PASSWORD).await;
    let mut admin = Client::login(&app, ADMIN, PASSWORD).await;

    let removed = admin
        .send(
            &app,
            actix_web::test::TestRequest::delete()
                .uri("/api/v1/admin/users/charlie.brown@dhs.lacounty.gov"),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let reply = victim.get(&app, "/api/v1/users/me").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["details"]["code"], "stale_session");
    assert!(!victim.has_session());
}

#[rstest]
#[actix_web::test]
async fn admin_views_the_app_as_the_test_user() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut admin = Client::login(&app, ADMIN, PASSWORD).await;

    let me = admin.get(&app, "/api/v1/users/me").await;
    assert_eq!(me.body["canSwitchToUserView"], true);

    let switched = admin.post(&app, "/api/v1/view/user", json!({})).await;
    assert_eq!(switched.status, StatusCode::OK);
    assert_eq!(switched.body["user"]["id"], TEST_USER);
    assert_eq!(switched.body["originalUser"]["id"], ADMIN);

    let roster = admin.get(&app, "/api/v1/admin/users").await;
    assert_eq!(roster.status, StatusCode::FORBIDDEN);

    let back = admin.post(&app, "/api/v1/view/admin", json!({})).await;
    assert_eq!(back.body["user"]["id"], ADMIN);
    assert_eq!(back.body["isViewingAsUser"], false);
    let roster = admin.get(&app, "/api/v1/admin/users").await;
    assert_eq!(roster.status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn other_users_cannot_switch_views() {
    let harness = Harness::seeded().await;
    let app = harness.app().await;
    let mut brianna = Client::login(&app, TEST_USER, PASSWORD).await;

    let reply = brianna.post(&app, "/api/v1/view/user", json!({})).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["message"], "Unauthorized action.");
}
