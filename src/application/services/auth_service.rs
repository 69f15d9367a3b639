//! Account registration, login, and bearer-session authentication.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::short_code::generate_opaque_token;

type HmacSha256 = Hmac<Sha256>;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Session lifetime when the client asks to be remembered.
const REMEMBER_TTL_DAYS: i64 = 14;

/// A freshly issued session: the opaque token handed to the client and its
/// expiry. The token itself is never stored.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Service for user accounts and bearer sessions.
///
/// Session tokens are opaque random strings. Storage only ever sees their
/// HMAC-SHA256 digest, keyed with the signing secret, so a leaked sessions
/// table cannot be replayed.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
    session_ttl_hours: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        signing_secret: String,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            signing_secret,
            session_ttl_hours,
        }
    }

    /// Registers a new account with an argon2-hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] for an already registered email and
    /// [`AppError::Validation`] for a too-short password.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        validate_password(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(
                "User with that email already exists.",
                json!({ "email": email }),
            ));
        }

        let password_hash = hash_password(password)?;

        self.users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
    }

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on unknown email or wrong
    /// password, without distinguishing the two.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(User, IssuedSession), AppError> {
        let invalid =
            || AppError::unauthorized("Invalid email or password", json!({}));

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let ttl = if remember {
            Duration::days(REMEMBER_TTL_DAYS)
        } else {
            Duration::hours(self.session_ttl_hours)
        };
        let expires_at = Utc::now() + ttl;

        let token = generate_opaque_token();
        self.sessions
            .create(user.id, &self.hash_token(&token), expires_at)
            .await?;

        Ok((user, IssuedSession { token, expires_at }))
    }

    /// Resolves a bearer token to its user, for request authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown, expired, or revoked
    /// sessions.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let invalid = || AppError::unauthorized("Invalid or expired session", json!({}));

        let session = self
            .sessions
            .find_active_by_hash(&self.hash_token(token))
            .await?
            .ok_or_else(invalid)?;

        self.users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(invalid)
    }

    /// Revokes the session behind a bearer token. Unknown tokens are a
    /// no-op so logout is idempotent.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.revoke(&self.hash_token(token)).await
    }

    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(
            "Password is too short",
            json!({ "min_length": MIN_PASSWORD_LENGTH }),
        ));
    }
    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        AppError::internal(
            "Stored password hash is malformed",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Session;
    use crate::domain::repositories::{MockSessionRepository, MockUserRepository};

    const SECRET: &str = "test-signing-secret";

    fn stored_user(password: &str) -> User {
        User {
            id: 1,
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            email_confirmed: false,
            email_confirmed_at: None,
            created_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository, sessions: MockSessionRepository) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(sessions), SECRET.to_string(), 24)
    }

    #[tokio::test]
    async fn test_signup_hashes_password() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        users
            .expect_create()
            .withf(|new_user| {
                new_user.password_hash != "hunter2secret"
                    && new_user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: 1,
                    name: new_user.name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    email_confirmed: false,
                    email_confirmed_at: None,
                    created_at: Utc::now(),
                })
            });

        let service = service(users, MockSessionRepository::new());

        let user = service
            .signup("Test User", "user@example.com", "hunter2secret")
            .await
            .unwrap();

        assert!(!user.email_confirmed);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("hunter2secret"))));

        let service = service(users, MockSessionRepository::new());

        let result = service
            .signup("Other", "user@example.com", "hunter2secret")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let service = service(MockUserRepository::new(), MockSessionRepository::new());

        let result = service.signup("Test", "user@example.com", "short").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_login_issues_session_and_stores_only_hash() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("hunter2secret"))));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .withf(|_, token_hash, _| {
                // 32-byte HMAC digest, hex encoded
                token_hash.len() == 64 && token_hash.chars().all(|c| c.is_ascii_hexdigit())
            })
            .times(1)
            .returning(|user_id, token_hash, expires_at| {
                Ok(Session {
                    id: 1,
                    user_id,
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    expires_at,
                    revoked_at: None,
                })
            });

        let service = service(users, sessions);

        let (user, issued) = service
            .login("user@example.com", "hunter2secret", false)
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(issued.token.len(), 48);
        assert!(issued.expires_at > Utc::now() + Duration::hours(23));
        assert!(issued.expires_at < Utc::now() + Duration::hours(25));
    }

    #[tokio::test]
    async fn test_login_remember_extends_expiry() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("hunter2secret"))));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .times(1)
            .returning(|user_id, token_hash, expires_at| {
                Ok(Session {
                    id: 1,
                    user_id,
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    expires_at,
                    revoked_at: None,
                })
            });

        let service = service(users, sessions);

        let (_, issued) = service
            .login("user@example.com", "hunter2secret", true)
            .await
            .unwrap();

        assert!(issued.expires_at > Utc::now() + Duration::days(13));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("hunter2secret"))));

        let service = service(users, MockSessionRepository::new());

        let result = service.login("user@example.com", "wrong-password", false).await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(users, MockSessionRepository::new());

        let result = service
            .login("nobody@example.com", "hunter2secret", false)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_active_by_hash()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(MockUserRepository::new(), sessions);

        let result = service.authenticate("bogus-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }
}
