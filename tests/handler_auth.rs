mod common;

use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn test_signup_login_me_round_trip(pool: PgPool) {
    let state = common::create_test_state(pool);
    let server = common::test_server(state);

    let (user_id, token) = common::signup_and_login(&server, "alice@example.com").await;

    let response = server.get("/api/auth/me").authorization_bearer(&token).await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["email_confirmed"], false);
}

#[sqlx::test]
async fn test_signup_duplicate_email_conflicts(pool: PgPool) {
    let state = common::create_test_state(pool);
    let server = common::test_server(state);

    common::signup_and_login(&server, "dup@example.com").await;

    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "name": "Again",
            "email": "dup@example.com",
            "password": "hunter2secret",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_signup_stores_password_hash_only(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::signup_and_login(&server, "hashed@example.com").await;

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
        .bind("hashed@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(!hash.contains("hunter2secret"));
}

#[sqlx::test]
async fn test_login_wrong_password_unauthorized(pool: PgPool) {
    let state = common::create_test_state(pool);
    let server = common::test_server(state);

    common::signup_and_login(&server, "bob@example.com").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "wrong-password",
        }))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_sessions_store_only_token_hashes(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let (_, token) = common::signup_and_login(&server, "hashes@example.com").await;

    let stored: String = sqlx::query_scalar("SELECT token_hash FROM sessions LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_ne!(stored, token);
    assert_eq!(stored.len(), 64);
}

#[sqlx::test]
async fn test_logout_revokes_session(pool: PgPool) {
    let state = common::create_test_state(pool);
    let server = common::test_server(state);

    let (_, token) = common::signup_and_login(&server, "carol@example.com").await;

    let response = server
        .post("/api/auth/logout")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();

    let response = server.get("/api/auth/me").authorization_bearer(&token).await;
    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_garbage_bearer_token_unauthorized(pool: PgPool) {
    let state = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .get("/api/auth/me")
        .authorization_bearer("definitely-not-a-session")
        .await;

    response.assert_status_unauthorized();
}
