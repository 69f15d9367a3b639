//! End-to-end flows for time-limited single-use tokens: password reset
//! and email confirmation.

mod common;

use serde_json::json;
use sqlx::PgPool;

async fn latest_token(pool: &PgPool, token_type: &str) -> String {
    sqlx::query_scalar(
        "SELECT token FROM time_limited_tokens WHERE token_type = $1 ORDER BY id DESC LIMIT 1",
    )
    .bind(token_type)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test]
async fn test_password_reset_flow(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "reset@example.com").await;

    let response = server
        .post("/api/password-reset")
        .json(&json!({ "email": "reset@example.com" }))
        .await;
    response.assert_status_ok();

    let token = latest_token(&pool, "password_reset").await;
    assert_eq!(token.len(), 48);

    let response = server
        .post("/api/password-reset/confirm")
        .json(&json!({ "token": token, "new_password": "brand-new-password" }))
        .await;
    response.assert_status_ok();

    // Old password no longer works, new one does.
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "reset@example.com", "password": "hunter2secret" }))
        .await;
    response.assert_status_unauthorized();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "reset@example.com", "password": "brand-new-password" }))
        .await;
    response.assert_status_ok();
}

#[sqlx::test]
async fn test_password_reset_token_is_single_use(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "once@example.com").await;

    server
        .post("/api/password-reset")
        .json(&json!({ "email": "once@example.com" }))
        .await;

    let token = latest_token(&pool, "password_reset").await;

    let response = server
        .post("/api/password-reset/confirm")
        .json(&json!({ "token": token, "new_password": "first-new-password" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/password-reset/confirm")
        .json(&json!({ "token": token, "new_password": "second-new-password" }))
        .await;
    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_password_reset_expired_token_rejected(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "stale@example.com").await;

    server
        .post("/api/password-reset")
        .json(&json!({ "email": "stale@example.com" }))
        .await;

    let token = latest_token(&pool, "password_reset").await;

    // Reset tokens live 4 hours; age this one past the limit.
    sqlx::query("UPDATE time_limited_tokens SET created_at = NOW() - INTERVAL '5 hours'")
        .execute(&pool)
        .await
        .unwrap();

    let response = server
        .post("/api/password-reset/confirm")
        .json(&json!({ "token": token, "new_password": "brand-new-password" }))
        .await;
    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_password_reset_unknown_email_is_silent(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let response = server
        .post("/api/password-reset")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    response.assert_status_ok();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_limited_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_email_confirmation_flow(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    // Signup issues the first confirmation token.
    let (_, token) = common::signup_and_login(&server, "confirm@example.com").await;

    let confirmation = latest_token(&pool, "email_confirmation").await;

    let response = server
        .post("/api/confirm-email")
        .json(&json!({ "token": confirmation }))
        .await;
    response.assert_status_ok();

    let response = server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_eq!(
        response.json::<serde_json::Value>()["email_confirmed"],
        true
    );
}

#[sqlx::test]
async fn test_email_confirmation_token_is_single_use(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "twice@example.com").await;

    let confirmation = latest_token(&pool, "email_confirmation").await;

    server
        .post("/api/confirm-email")
        .json(&json!({ "token": confirmation }))
        .await
        .assert_status_ok();

    server
        .post("/api/confirm-email")
        .json(&json!({ "token": confirmation }))
        .await
        .assert_status_bad_request();
}

#[sqlx::test]
async fn test_resend_issues_new_token_for_unconfirmed_account(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "resend@example.com").await;

    let response = server
        .post("/api/confirm-email/resend")
        .json(&json!({ "email": "resend@example.com" }))
        .await;
    response.assert_status_ok();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM time_limited_tokens WHERE token_type = 'email_confirmation'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test]
async fn test_resend_for_confirmed_account_issues_nothing(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "done@example.com").await;

    let confirmation = latest_token(&pool, "email_confirmation").await;
    server
        .post("/api/confirm-email")
        .json(&json!({ "token": confirmation }))
        .await
        .assert_status_ok();

    server
        .post("/api/confirm-email/resend")
        .json(&json!({ "email": "done@example.com" }))
        .await
        .assert_status_ok();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM time_limited_tokens WHERE token_type = 'email_confirmation'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}
