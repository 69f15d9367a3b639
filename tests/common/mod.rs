#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, middleware};
use axum_test::TestServer;
use qr_shortener::api::{self, middleware::auth};
use qr_shortener::api::handlers::redirect_handler;
use qr_shortener::config::{Config, EmailBackendKind};
use qr_shortener::infrastructure::email::ConsoleEmailBackend;
use qr_shortener::infrastructure::persistence::{
    PgQrCodeRepository, PgSessionRepository, PgTokenRepository, PgUserRepository,
};
use qr_shortener::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

pub const BASE_URL: &str = "http://localhost:3000";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        listen_addr: "0.0.0.0:3000".to_string(),
        base_url: BASE_URL.to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        session_signing_secret: "test-signing-secret".to_string(),
        session_ttl_hours: 24,
        password_reset_ttl_hours: 4,
        email_confirmation_ttl_hours: 48,
        email_backend: EmailBackendKind::Console,
        email_provider_region: "us-east-1".to_string(),
        email_sender: "no-reply@example.com".to_string(),
        email_provider_api_key: None,
        email_provider_url: None,
        db_max_connections: 5,
        db_connect_timeout: 30,
        db_idle_timeout: 600,
        db_max_lifetime: 1800,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let config = test_config();

    AppState::new(
        pool.clone(),
        &config,
        Arc::new(PgQrCodeRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgTokenRepository::new(pool)),
        Arc::new(ConsoleEmailBackend::new("no-reply@example.com".to_string())),
    )
}

/// Full application router without rate limiting, so tests need no
/// connect-info plumbing.
pub fn test_server(state: AppState) -> TestServer {
    let api_router = api::routes::public_routes().merge(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
    );

    let app = Router::new()
        .route("/go/{code}", axum::routing::get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub async fn create_test_qr(
    pool: &PgPool,
    user_id: i64,
    short_code: Option<&str>,
    original_url: Option<&str>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO qr_codes (id, user_id, content, original_url, use_url_shortening, short_code) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(original_url.unwrap_or("plain data"))
    .bind(original_url)
    .bind(short_code.is_some())
    .bind(short_code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn scan_count(pool: &PgPool, short_code: &str) -> i64 {
    sqlx::query_scalar("SELECT scan_count FROM qr_codes WHERE short_code = $1")
        .bind(short_code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Signs up a user over the API and returns `(user_id, bearer_token)`.
pub async fn signup_and_login(server: &TestServer, email: &str) -> (i64, String) {
    let signup = server
        .post("/api/auth/signup")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "hunter2secret",
        }))
        .await;
    signup.assert_status(axum::http::StatusCode::CREATED);

    let user_id = signup.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let login = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "hunter2secret",
        }))
        .await;
    login.assert_status_ok();

    let token = login.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    (user_id, token)
}
